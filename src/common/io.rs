use std::fs::{self, File};
use std::io::{self, Read};
use std::ops::Deref;
use std::path::Path;

#[cfg(target_os = "linux")]
use std::sync::atomic::{AtomicBool, Ordering};

use memmap2::MmapOptions;

/// Holds input data, either a read-only mmap or an owned Vec.
/// Dereferences to `&[u8]` so the parser never cares which one it got.
pub enum FileData {
    Mmap(memmap2::Mmap),
    Owned(Vec<u8>),
}

impl Deref for FileData {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            FileData::Mmap(m) => m,
            FileData::Owned(v) => v,
        }
    }
}

/// Files under 1MB are read() into a Vec; mmap setup costs more than the copy.
const MMAP_THRESHOLD: u64 = 1024 * 1024;

/// Cleared after the first EPERM so we stop retrying O_NOATIME.
#[cfg(target_os = "linux")]
static NOATIME_SUPPORTED: AtomicBool = AtomicBool::new(true);

/// Open a file with O_NOATIME on Linux to avoid atime inode writes.
#[cfg(target_os = "linux")]
fn open_noatime(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    if NOATIME_SUPPORTED.load(Ordering::Relaxed) {
        match fs::OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NOATIME)
            .open(path)
        {
            Ok(f) => return Ok(f),
            Err(ref e) if e.raw_os_error() == Some(libc::EPERM) => {
                // O_NOATIME requires file ownership or CAP_FOWNER
                NOATIME_SUPPORTED.store(false, Ordering::Relaxed);
            }
            Err(e) => return Err(e),
        }
    }
    File::open(path)
}

#[cfg(not(target_os = "linux"))]
fn open_noatime(path: &Path) -> io::Result<File> {
    File::open(path)
}

/// Read a whole file: exact-size read() for small files, mmap for large ones.
pub fn read_file(path: &Path) -> io::Result<FileData> {
    let file = open_noatime(path)?;
    let metadata = file.metadata()?;
    let len = metadata.len();

    if !metadata.file_type().is_file() {
        // FIFOs and /dev/stdin on a pipe report length 0: stream them
        let mut buf = Vec::new();
        let mut reader = file;
        reader.read_to_end(&mut buf)?;
        return Ok(FileData::Owned(buf));
    }

    if len == 0 {
        return Ok(FileData::Owned(Vec::new()));
    }

    if len < MMAP_THRESHOLD {
        let mut buf = vec![0u8; len as usize];
        let n = read_full(&mut &file, &mut buf)?;
        buf.truncate(n);
        return Ok(FileData::Owned(buf));
    }

    // SAFETY: read-only mapping; the file is not modified while we hold it.
    match unsafe { MmapOptions::new().map(&file) } {
        Ok(mmap) => {
            #[cfg(target_os = "linux")]
            {
                let _ = mmap.advise(memmap2::Advice::Sequential);
                let _ = mmap.advise(memmap2::Advice::WillNeed);
            }
            Ok(FileData::Mmap(mmap))
        }
        Err(_) => {
            let mut buf = vec![0u8; len as usize];
            let n = read_full(&mut &file, &mut buf)?;
            buf.truncate(n);
            Ok(FileData::Owned(buf))
        }
    }
}

/// Read a named input, treating "-" as standard input.
pub fn read_input(path: &Path) -> io::Result<FileData> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        Ok(FileData::Owned(buf))
    } else {
        read_file(path)
    }
}

/// Fill `buf` from `reader`, retrying short reads. Returns bytes read.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let n = reader.read(buf)?;
    if n == buf.len() || n == 0 {
        return Ok(n);
    }
    let mut total = n;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}
