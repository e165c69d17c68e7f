use super::handle::{Handle, HandleIndex};

/// `HandlePool` manages the manipulations of a `Handle` collection, which are
/// created with a continuous `index` field. It also have the ability to find
/// out the current status of a specified `Handle`.
///
/// An odd version marks an alive index, an even one a freed index.
#[derive(Debug, Default)]
pub struct HandlePool {
    versions: Vec<HandleIndex>,
    frees: Vec<HandleIndex>,
}

impl HandlePool {
    /// Constructs a new, empty `HandlePool`.
    pub fn new() -> Self {
        HandlePool {
            versions: Vec::new(),
            frees: Vec::new(),
        }
    }

    /// Creates a unused `Handle`. Freed indices are reused last-in first-out.
    pub fn create(&mut self) -> Handle {
        if let Some(index) = self.frees.pop() {
            let version = &mut self.versions[index as usize];
            *version += 1;
            Handle::new(index, *version)
        } else {
            self.versions.push(1);
            Handle::new(self.versions.len() as HandleIndex - 1, 1)
        }
    }

    /// Returns true if this `Handle` was created by `HandlePool`, and has not been
    /// freed yet.
    #[inline]
    pub fn is_alive(&self, handle: Handle) -> bool {
        self.versions
            .get(handle.index() as usize)
            .map(|&v| v & 0x1 == 1 && v == handle.version())
            .unwrap_or(false)
    }

    /// Recycles the `Handle` index, and mark its version as dead.
    pub fn free(&mut self, handle: Handle) -> bool {
        if !self.is_alive(handle) {
            return false;
        }

        self.versions[handle.index() as usize] += 1;
        self.frees.push(handle.index());
        true
    }

    /// Returns the total number of alive handle in this `HandlePool`.
    #[inline]
    pub fn len(&self) -> usize {
        self.versions.len() - self.frees.len()
    }

    /// Checks if the pool is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn basic() {
        let mut pool = HandlePool::new();

        let e1 = pool.create();
        assert!(pool.is_alive(e1));
        assert_eq!(pool.len(), 1);

        assert!(pool.free(e1));
        assert!(!pool.is_alive(e1));
        assert!(!pool.free(e1));
        assert_eq!(pool.len(), 0);
        assert!(pool.is_empty());
    }

    #[test]
    fn recycle() {
        let mut pool = HandlePool::new();

        let e1 = pool.create();
        let e2 = pool.create();
        pool.free(e1);

        let e3 = pool.create();
        assert_eq!(e3.index(), e1.index());
        assert_ne!(e3.version(), e1.version());
        assert!(!pool.is_alive(e1));
        assert!(pool.is_alive(e2));
        assert!(pool.is_alive(e3));
        assert_eq!(pool.len(), 2);
    }
}
