use alloc::vec::Vec;

use crate::{ErrorKind, tokenizer::Container};

/// LIFO of the containers the cursor is currently inside.
///
/// Grows on demand up to `limit` frames; the top frame is the innermost
/// container.
#[derive(Debug, Clone)]
pub(crate) struct NestingStack {
    frames: Vec<Container>,
    limit: usize,
}

impl NestingStack {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            frames: Vec::new(),
            limit,
        }
    }

    pub(crate) fn push(&mut self, container: Container) -> Result<(), ErrorKind> {
        if self.frames.len() >= self.limit {
            return Err(ErrorKind::DepthLimitExceeded { limit: self.limit });
        }
        self.frames.push(container);
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> Option<Container> {
        self.frames.pop()
    }

    pub(crate) fn peek(&self) -> Option<Container> {
        self.frames.last().copied()
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
