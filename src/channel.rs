//! Named read/write access to kernel state through sysctl
//!
//! `StatsChannel` is the seam between the fetch/reset logic and the
//! platform transport, so tests can substitute an in-memory channel.

use crate::error::ChannelError;


/// Well-known sysctl node holding `struct gsostat`
pub const GSO_SYSCTL_STATS: &str = "net.gso.stats";

pub trait StatsChannel {
    /// Reads up to `size_hint` bytes from the node `name`
    fn read(&mut self, name: &str, size_hint: usize) -> Result<Vec<u8>, ChannelError>;
    /// Overwrites the node `name` with `data`
    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), ChannelError>;
}

/// The kernel's sysctl interface, via `sysctlbyname(3)`
#[derive(Default, Debug)]
pub struct SysctlChannel;

impl SysctlChannel {
    pub fn new() -> Self {
        SysctlChannel
    }
}

#[cfg(any(target_os = "freebsd", target_os = "dragonfly", target_os = "netbsd",
          target_os = "macos", target_os = "ios"))]
mod imp {
    use std::ffi::CString;
    use std::io;
    use std::ptr;
    use libc::{c_void, size_t};
    use crate::error::ChannelError;

    fn c_name(name: &str) -> Result<CString, ChannelError> {
        CString::new(name).map_err(|_| ChannelError::InvalidName(name.to_string()))
    }

    fn os_error(name: &str) -> ChannelError {
        ChannelError::Io {
            name: name.to_string(),
            source: io::Error::last_os_error(),
        }
    }

    pub fn read(name: &str, size_hint: usize) -> Result<Vec<u8>, ChannelError> {
        let cname = c_name(name)?;
        let mut buf = vec![0u8; size_hint];
        let mut len: size_t = size_hint as size_t;
        let rc = unsafe {
            libc::sysctlbyname(cname.as_ptr(), buf.as_mut_ptr() as *mut c_void,
                               &mut len, ptr::null_mut(), 0)
        };
        if rc != 0 {
            return Err(os_error(name));
        }
        buf.truncate(len as usize);
        Ok(buf)
    }

    pub fn write(name: &str, data: &[u8]) -> Result<(), ChannelError> {
        let cname = c_name(name)?;
        let rc = unsafe {
            libc::sysctlbyname(cname.as_ptr(), ptr::null_mut(), ptr::null_mut(),
                               data.as_ptr() as *mut c_void, data.len() as size_t)
        };
        if rc != 0 {
            return Err(os_error(name));
        }
        Ok(())
    }
}

#[cfg(not(any(target_os = "freebsd", target_os = "dragonfly", target_os = "netbsd",
              target_os = "macos", target_os = "ios")))]
mod imp {
    use crate::error::ChannelError;

    pub fn read(_name: &str, _size_hint: usize) -> Result<Vec<u8>, ChannelError> {
        Err(ChannelError::Unsupported)
    }

    pub fn write(_name: &str, _data: &[u8]) -> Result<(), ChannelError> {
        Err(ChannelError::Unsupported)
    }
}

impl StatsChannel for SysctlChannel {
    fn read(&mut self, name: &str, size_hint: usize) -> Result<Vec<u8>, ChannelError> {
        imp::read(name, size_hint)
    }

    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), ChannelError> {
        imp::write(name, data)
    }
}

#[cfg(test)]
pub mod fake {
    use super::StatsChannel;
    use crate::error::ChannelError;
    use std::io;

    /// In-memory channel holding a single node's bytes
    #[derive(Default)]
    pub struct FakeChannel {
        pub data: Vec<u8>,
        pub fail_read: bool,
        pub fail_write: bool,
        pub reads: usize,
        pub writes: Vec<(String, Vec<u8>)>,
    }

    impl FakeChannel {
        pub fn with_data(data: Vec<u8>) -> Self {
            FakeChannel { data, ..Default::default() }
        }

        fn denied(name: &str) -> ChannelError {
            ChannelError::Io {
                name: name.to_string(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            }
        }
    }

    impl StatsChannel for FakeChannel {
        fn read(&mut self, name: &str, size_hint: usize) -> Result<Vec<u8>, ChannelError> {
            self.reads += 1;
            if self.fail_read {
                return Err(Self::denied(name));
            }
            Ok(self.data.iter().copied().take(size_hint).collect())
        }

        fn write(&mut self, name: &str, data: &[u8]) -> Result<(), ChannelError> {
            if self.fail_write {
                return Err(Self::denied(name));
            }
            self.writes.push((name.to_string(), data.to_vec()));
            self.data = data.to_vec();
            Ok(())
        }
    }
}

#[cfg(not(any(target_os = "freebsd", target_os = "dragonfly", target_os = "netbsd",
              target_os = "macos", target_os = "ios")))]
#[test]
fn test_sysctl_unsupported() {
    let mut chan = SysctlChannel::new();
    assert!(matches!(chan.read(GSO_SYSCTL_STATS, 8), Err(ChannelError::Unsupported)));
    assert!(matches!(chan.write(GSO_SYSCTL_STATS, &[0u8; 8]), Err(ChannelError::Unsupported)));
}

#[cfg(any(target_os = "freebsd", target_os = "dragonfly", target_os = "netbsd",
          target_os = "macos", target_os = "ios"))]
#[test]
fn test_sysctl_invalid_name() {
    let mut chan = SysctlChannel::new();
    assert!(matches!(chan.read("net.gso\0stats", 8), Err(ChannelError::InvalidName(_))));
}
