use std::ops::Deref;

/// A fixed-capacity string backed by an inline byte array.
///
/// sysfs attribute values are short decimal or keyword strings, so every
/// write in this crate is formatted through a `FixedStr` of the attribute
/// buffer size rather than a heap allocation. Writes come in two flavors:
/// strict ([`write`](Self::write), and the `core::fmt::Write` impl built on
/// it), and truncating ([`write_truncating`](Self::write_truncating)) for
/// the register-access layer, where an over-long value is clipped and
/// reported rather than rejected.
#[derive(Clone, Copy)]
pub struct FixedStr<const N: usize> {
    s: [u8; N],
}

impl<const N: usize> FixedStr<N> {
    #[inline]
    pub const fn empty() -> Self {
        Self { s: [0; N] }
    }

    #[inline]
    pub fn new(s: &str) -> Result<Self, FixedStrErr> {
        let mut f = Self::empty();
        f.write(s)?;
        Ok(f)
    }

    /// Builds from raw bytes read out of a pseudo-file, stopping at the
    /// first NUL. Fails if the content is over-long or not UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FixedStrErr> {
        let len = if let Some(len) = bytes.iter().take(N).position(|c| *c == 0) {
            len
        } else if bytes.len() <= N {
            bytes.len()
        } else {
            return Err(FixedStrErr::CapacityOverflow {
                capacity: N,
                required: bytes.len(),
            });
        };

        let mut s = [0; N];

        s[..len].copy_from_slice(&bytes[..len]);

        let _ = core::str::from_utf8(&s[..len])?;

        Ok(Self { s })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.s.iter().position(|c| *c == 0).unwrap_or(N)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        let l = self.len();
        let s = &self.s[0..l];
        unsafe { std::str::from_utf8_unchecked(s) }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.s[..self.len()]
    }

    /// Appends `s`, failing without mutation if it does not fit.
    pub fn write(&mut self, s: &str) -> Result<(), FixedStrErr> {
        let l = self.len();
        let new_len = l + s.len();

        if new_len > N {
            return Err(FixedStrErr::CapacityOverflow {
                capacity: N,
                required: new_len,
            });
        }

        let rem = &mut self.s[l..new_len];

        rem.copy_from_slice(s.as_bytes());
        Ok(())
    }

    /// Appends as much of `s` as fits, clipping at a character boundary.
    ///
    /// Returns `true` if anything was clipped.
    pub fn write_truncating(&mut self, s: &str) -> bool {
        let l = self.len();
        let room = N - l;

        if s.len() <= room {
            self.s[l..l + s.len()].copy_from_slice(s.as_bytes());
            return false;
        }

        let mut fit = 0;
        for (idx, _) in s.char_indices() {
            if idx > room {
                break;
            }
            fit = idx;
        }

        self.s[l..l + fit].copy_from_slice(&s.as_bytes()[..fit]);
        true
    }
}

impl<const N: usize> std::fmt::Write for FixedStr<N> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.write(s).map_err(|_| std::fmt::Error)
    }
}

impl<const N: usize> Default for FixedStr<N> {
    #[inline(always)]
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> std::fmt::Debug for FixedStr<N> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FixedStr").field(&self.as_str()).finish()
    }
}

impl<const N: usize> std::fmt::Display for FixedStr<N> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_str().fmt(f)
    }
}

impl<const N: usize> AsRef<str> for FixedStr<N> {
    #[inline(always)]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<const N: usize> Deref for FixedStr<N> {
    type Target = str;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

#[derive(Debug, Clone, Copy, thiserror::Error)]
pub enum FixedStrErr {
    #[error(
        "Exceeded fixed string size: required {required} bytes with only {capacity} available"
    )]
    CapacityOverflow { capacity: usize, required: usize },
    #[error("UTF8 Error")]
    Utf8(#[from] core::str::Utf8Error),
}

impl From<FixedStrErr> for std::io::Error {
    fn from(value: FixedStrErr) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, value)
    }
}
