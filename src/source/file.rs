use std::{fmt::Display, rc::Rc};

/// An offset into the offset space of a [`FileSet`].
///
/// Offset 0 is reserved for "no position"; every file registered in a set
/// starts at a base of at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pos(usize);

impl Pos {
    pub const NONE: Pos = Pos(0);

    pub fn new(offset: usize) -> Self {
        Pos(offset)
    }

    pub fn is_valid(&self) -> bool {
        *self != Pos::NONE
    }

    pub fn offset(&self) -> usize {
        self.0
    }
}

/// Human readable location of a [`Pos`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub filename: Rc<String>,
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn null() -> Self {
        Position {
            filename: Rc::new(String::new()),
            row: 0,
            col: 0,
        }
    }

    /// `row:col`, without the file name. This is the form used inside
    /// diagnostic messages.
    pub fn line_col(&self) -> String {
        format!("{}:{}", self.row, self.col)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.filename.is_empty() {
            write!(f, "{}:{}", self.row, self.col)
        } else {
            write!(f, "{}:{}:{}", self.filename, self.row, self.col)
        }
    }
}

/// One source unit inside a [`FileSet`].
///
/// The newline table is filled in by the lexer while it scans, so a file is
/// only complete once scanning has reached the end of input.
#[derive(Debug, Clone)]
pub struct File {
    name: Rc<String>,
    base: usize,
    size: usize,
    lines: Vec<usize>,
}

impl File {
    pub fn new(name: &str, base: usize, size: usize) -> Self {
        File {
            name: Rc::new(String::from(name)),
            base,
            size,
            lines: Vec::with_capacity(16),
        }
    }

    pub fn name(&self) -> Rc<String> {
        Rc::clone(&self.name)
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Relative offsets of every newline recorded so far, in ascending order.
    pub fn lines(&self) -> &[usize] {
        &self.lines
    }

    /// Records a newline at `offset`. Offsets outside the file, or not past
    /// the last recorded newline, are ignored.
    pub fn add_line(&mut self, offset: usize) {
        if offset >= self.size {
            return;
        }
        if self.lines.last().map_or(true, |&last| offset > last) {
            self.lines.push(offset);
        }
    }

    /// Converts a relative offset into a global [`Pos`].
    ///
    /// # Panics
    ///
    /// Panics if `offset` is not inside `[0, size)`. The lexer never produces
    /// such an offset, so this is a programming error rather than a user one.
    pub fn pos(&self, offset: usize) -> Pos {
        if offset >= self.size {
            panic!(
                "illegal file offset {} for {} (size {})",
                offset, self.name, self.size
            );
        }
        Pos(self.base + offset)
    }

    /// Position reported for end of input: the last rune of the file, or the
    /// file base when the file is empty.
    pub fn eof_pos(&self) -> Pos {
        Pos(self.base + self.size.saturating_sub(1))
    }

    /// Resolves `p` to a row and column.
    ///
    /// The column is recomputed against every recorded newline that lies
    /// before `p` while walking the table front to back, so the result always
    /// reflects the last newline passed.
    pub fn position(&self, p: Pos) -> Position {
        let p = p.offset() as isize;
        let base = self.base as isize;

        let mut col = p - base + 1;
        let mut row = 1;

        for &nl in &self.lines {
            let nl_pos = (self.base + nl) as isize;
            if p > nl_pos {
                col = p - nl_pos - base + 1;
                row += 1;
            }
        }

        Position {
            filename: self.name(),
            row,
            col: col.max(0) as usize,
        }
    }
}

/// Registry of files sharing one offset space.
#[derive(Debug)]
pub struct FileSet {
    base: usize,
    files: Vec<File>,
}

impl Default for FileSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSet {
    pub fn new() -> Self {
        FileSet {
            base: 1,
            files: vec![],
        }
    }

    /// Registers a new file. Its base is the running total of the lengths of
    /// every file added before it, starting at 1.
    pub fn add(&mut self, name: &str, source: &str) -> &mut File {
        let file = File::new(name, self.base, source.len());
        self.base += source.len();
        self.files.push(file);
        let last = self.files.len() - 1;
        &mut self.files[last]
    }

    pub fn files(&self) -> &[File] {
        &self.files
    }

    /// Resolves `p` through the file whose offset range contains it.
    ///
    /// # Panics
    ///
    /// Panics if `p` is [`Pos::NONE`] or lies outside every registered file.
    pub fn position(&self, p: Pos) -> Position {
        if !p.is_valid() {
            panic!("invalid position");
        }

        self.files
            .iter()
            .rev()
            .find(|f| p.offset() >= f.base() && p.offset() < f.base() + f.size())
            .map(|f| f.position(p))
            .unwrap_or_else(|| panic!("position {} outside every registered file", p.offset()))
    }
}
