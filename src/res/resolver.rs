//! Maps logical resource paths to their content.

use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

use crate::errors::*;
use crate::utils::prelude::FastHashMap;

/// A path resolution service. Builtin paths never reach a resolver.
pub trait PathResolver: Send + Sync + 'static {
    /// Checks if the file exists.
    fn exists(&self, path: &str) -> bool;

    /// Returns the physical location of a logical path, if there is any.
    fn locate(&self, path: &str) -> Option<PathBuf>;

    /// Reads the whole content of `path` into `buf`.
    fn read_to_end(&self, path: &str, buf: &mut Vec<u8>) -> io::Result<usize>;
}

/// Resolves paths relative to a content root on disk.
#[derive(Debug, Clone)]
pub struct Directory {
    root: PathBuf,
}

impl Directory {
    pub fn new<T: Into<PathBuf>>(root: T) -> Result<Self> {
        let root = root.into();
        info!("[Directory] creates resolver at {:?}.", root);

        let metadata = fs::metadata(&root)?;
        if metadata.is_dir() {
            Ok(Directory { root })
        } else {
            Err(Error::NotFound(format!("{:?} is not a directory", root)))
        }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonicalizes `path` lexically. Absolute paths and paths escaping the
    /// content root through `..` are rejected.
    pub fn canonicalize(path: &str) -> Option<PathBuf> {
        let mut buf = PathBuf::new();
        for v in Path::new(path).components() {
            match v {
                Component::Normal(name) => buf.push(name),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !buf.pop() {
                        return None;
                    }
                }
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        if buf.as_os_str().is_empty() {
            None
        } else {
            Some(buf)
        }
    }
}

impl PathResolver for Directory {
    fn exists(&self, path: &str) -> bool {
        self.locate(path).map(|v| v.is_file()).unwrap_or(false)
    }

    fn locate(&self, path: &str) -> Option<PathBuf> {
        Directory::canonicalize(path).map(|v| self.root.join(v))
    }

    fn read_to_end(&self, path: &str, buf: &mut Vec<u8>) -> io::Result<usize> {
        let location = self.locate(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} escapes the content root", path),
            )
        })?;

        let mut file = fs::File::open(&location)?;
        file.read_to_end(buf)
    }
}

/// An in-process file system, handy for tools and tests.
#[derive(Debug, Default)]
pub struct Memory {
    files: RwLock<FastHashMap<String, Vec<u8>>>,
}

impl Memory {
    pub fn new() -> Self {
        Memory::default()
    }

    /// Creates or overwrites a file.
    pub fn insert<T: AsRef<str>, B: Into<Vec<u8>>>(&self, path: T, bytes: B) {
        let mut files = self.files.write().unwrap();
        files.insert(path.as_ref().to_owned(), bytes.into());
    }

    pub fn remove<T: AsRef<str>>(&self, path: T) -> bool {
        let mut files = self.files.write().unwrap();
        files.remove(path.as_ref()).is_some()
    }

    pub fn len(&self) -> usize {
        self.files.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PathResolver for Memory {
    fn exists(&self, path: &str) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    fn locate(&self, _: &str) -> Option<PathBuf> {
        None
    }

    fn read_to_end(&self, path: &str, buf: &mut Vec<u8>) -> io::Result<usize> {
        let files = self.files.read().unwrap();
        let bytes = files
            .get(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_owned()))?;

        buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn canonicalize() {
        let v = Directory::canonicalize("a/./b/../c.bin").unwrap();
        assert_eq!(v, Path::new("a").join("c.bin"));

        assert!(Directory::canonicalize("../c.bin").is_none());
        assert!(Directory::canonicalize("a/../../c.bin").is_none());
        assert!(Directory::canonicalize("/etc/passwd").is_none());
        assert!(Directory::canonicalize("").is_none());
    }

    #[test]
    fn directory() {
        let root = std::env::temp_dir().join("rescache-resolver-test");
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("sub/x.bin"), b"hello").unwrap();

        let dir = Directory::new(&root).unwrap();
        assert!(dir.exists("sub/x.bin"));
        assert!(dir.exists("./sub/../sub/x.bin"));
        assert!(!dir.exists("sub"));
        assert!(!dir.exists("../x.bin"));

        let mut buf = Vec::new();
        assert_eq!(dir.read_to_end("sub/x.bin", &mut buf).unwrap(), 5);
        assert_eq!(&buf, b"hello");
        assert!(dir.read_to_end("../sub/x.bin", &mut buf).is_err());

        assert!(Directory::new(root.join("sub/x.bin")).is_err());
    }

    #[test]
    fn memory() {
        let memory = Memory::new();
        memory.insert("a.bin", vec![1, 2, 3]);
        assert!(memory.exists("a.bin"));
        assert!(!memory.exists("b.bin"));

        let mut buf = Vec::new();
        assert_eq!(memory.read_to_end("a.bin", &mut buf).unwrap(), 3);
        assert!(memory.read_to_end("b.bin", &mut buf).is_err());

        assert!(memory.remove("a.bin"));
        assert!(memory.is_empty());
    }
}
