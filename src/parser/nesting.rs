//! Brace depth and the stack of open type scopes.

/// Default cap on tracked type scopes.
pub const DEFAULT_MAX_NESTING: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    /// Brace depth right after the scope's `{`.
    depth: usize,
    /// Index of the type declaration that opened the scope.
    decl: usize,
}

#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<Frame>,
    depth: usize,
    cap: usize,
    untracked: usize,
}

impl ScopeStack {
    pub fn new(cap: usize) -> Self {
        Self {
            frames: Vec::new(),
            depth: 0,
            cap,
            untracked: 0,
        }
    }

    /// Current brace depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Record a `{`; returns the new depth.
    pub fn open_brace(&mut self) -> usize {
        self.depth += 1;
        self.depth
    }

    /// Record a `}`, leaving the innermost scope if this brace closes it.
    pub fn close_brace(&mut self) {
        if self.frames.last().is_some_and(|f| f.depth == self.depth) {
            self.frames.pop();
        }
        self.depth = self.depth.saturating_sub(1);
    }

    /// Make `decl` the parent of everything until the brace just opened is
    /// closed. Returns `false` if the cap is reached; the scope's members then
    /// stay with the outer parent.
    pub fn enter(&mut self, decl: usize) -> bool {
        if self.frames.len() >= self.cap {
            self.untracked += 1;
            return false;
        }
        self.frames.push(Frame { depth: self.depth, decl });
        true
    }

    /// Innermost open type declaration.
    pub fn parent(&self) -> Option<usize> {
        self.frames.last().map(|f| f.decl)
    }

    /// Scopes that were not tracked because of the cap.
    pub fn untracked(&self) -> usize {
        self.untracked
    }
}
