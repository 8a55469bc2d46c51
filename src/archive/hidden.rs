use std::io;
use std::path::Path;

/// Set or clear the OS hidden attribute
///
/// Windows does not hide dot-files, so the attribute is set directly.
#[cfg(windows)]
pub fn set_hidden(path: &Path, hidden: bool) -> io::Result<()> {
    use std::os::windows::ffi::OsStrExt;
    use windows_sys::Win32::Storage::FileSystem::{
        FILE_ATTRIBUTE_HIDDEN, GetFileAttributesW, INVALID_FILE_ATTRIBUTES, SetFileAttributesW,
    };

    let wide: Vec<u16> = path
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    // SAFETY: `wide` is NUL-terminated and outlives both calls.
    let attributes = unsafe { GetFileAttributesW(wide.as_ptr()) };
    if attributes == INVALID_FILE_ATTRIBUTES {
        return Err(io::Error::last_os_error());
    }

    let updated = if hidden {
        attributes | FILE_ATTRIBUTE_HIDDEN
    } else {
        attributes & !FILE_ATTRIBUTE_HIDDEN
    };

    // SAFETY: as above.
    if unsafe { SetFileAttributesW(wide.as_ptr(), updated) } == 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

/// Leading-dot names are already hidden here
#[cfg(not(windows))]
pub fn set_hidden(_path: &Path, _hidden: bool) -> io::Result<()> {
    Ok(())
}
