//! Resource namespaces: lookup-by-path access to bundled files.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Lookup-by-path access to a bundle, packed or unpacked.
///
/// Paths are logical, slash-separated keys such as
/// `lib/com.example.hello/linux-x64/libNative.so`.
pub trait ResourceNamespace {
    /// Direct filesystem location of the resource, if it is already
    /// file-addressable and needs no extraction.
    fn locate(&self, path: &str) -> Option<PathBuf>;

    /// Open a byte stream over the resource. `Ok(None)` means the resource
    /// does not exist; `Err` is a real I/O failure.
    fn open(&self, path: &str) -> io::Result<Option<Box<dyn Read + '_>>>;
}

impl<N: ResourceNamespace + ?Sized> ResourceNamespace for &N {
    fn locate(&self, path: &str) -> Option<PathBuf> {
        (**self).locate(path)
    }

    fn open(&self, path: &str) -> io::Result<Option<Box<dyn Read + '_>>> {
        (**self).open(path)
    }
}

/// Resources unpacked on disk under a root directory.
///
/// Everything present is file-addressable, so resolution never extracts.
#[derive(Debug, Clone)]
pub struct DirNamespace {
    root: PathBuf,
}

impl DirNamespace {
    /// The root is made absolute up front so located paths are absolute.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl ResourceNamespace for DirNamespace {
    fn locate(&self, path: &str) -> Option<PathBuf> {
        let file = self.resolve(path);
        file.is_file().then_some(file)
    }

    fn open(&self, path: &str) -> io::Result<Option<Box<dyn Read + '_>>> {
        match File::open(self.resolve(path)) {
            Ok(file) => Ok(Some(Box::new(file))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Resources packed in a zip bundle.
///
/// Entries are never file-addressable; resolution always goes through the
/// extraction path.
#[cfg(feature = "zip")]
pub struct ZipNamespace {
    archive: std::sync::Mutex<zip::ZipArchive<File>>,
}

#[cfg(feature = "zip")]
impl ZipNamespace {
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        let archive = zip::ZipArchive::new(file).map_err(io::Error::other)?;
        Ok(Self {
            archive: std::sync::Mutex::new(archive),
        })
    }
}

#[cfg(feature = "zip")]
impl ResourceNamespace for ZipNamespace {
    fn locate(&self, _path: &str) -> Option<PathBuf> {
        None
    }

    fn open(&self, path: &str) -> io::Result<Option<Box<dyn Read + '_>>> {
        use std::sync::PoisonError;

        let mut archive = self.archive.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entry = match archive.by_name(path) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(zip::result::ZipError::Io(err)) => return Err(err),
            Err(err) => return Err(io::Error::other(err)),
        };

        // ZipFile borrows the archive lock, so the entry is drained here and
        // handed out as an owned buffer.
        let mut content = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut content)?;
        Ok(Some(Box::new(io::Cursor::new(content))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn dir_namespace_locates_existing_files() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("libs/linux-x64");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("libx.so"), b"elf").unwrap();

        let namespace = DirNamespace::new(dir.path());
        let located = namespace.locate("libs/linux-x64/libx.so").unwrap();
        assert!(located.is_absolute());
        assert_eq!(fs::read(located).unwrap(), b"elf");

        assert!(namespace.locate("libs/linux-x64/missing.so").is_none());
        assert!(namespace.locate("libs/linux-x64").is_none());
    }

    #[test]
    fn dir_namespace_open_signals_absence() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("present"), b"data").unwrap();

        let namespace = DirNamespace::new(dir.path());
        let mut content = Vec::new();
        namespace
            .open("present")
            .unwrap()
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content, b"data");

        assert!(namespace.open("absent").unwrap().is_none());
    }

    #[cfg(feature = "zip")]
    #[test]
    fn zip_namespace_streams_entries() {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let dir = tempdir().unwrap();
        let bundle = dir.path().join("bundle.zip");
        let mut writer = zip::ZipWriter::new(File::create(&bundle).unwrap());
        writer
            .start_file("libs/linux-x64/libx.so", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"binary payload").unwrap();
        writer.finish().unwrap();

        let namespace = ZipNamespace::new(&bundle).unwrap();
        assert!(namespace.locate("libs/linux-x64/libx.so").is_none());

        let mut content = Vec::new();
        namespace
            .open("libs/linux-x64/libx.so")
            .unwrap()
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content, b"binary payload");

        assert!(namespace.open("libs/linux-x64/other.so").unwrap().is_none());
    }
}
