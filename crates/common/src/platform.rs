use std::fmt;

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
compile_error!("toolup supports only x86_64 and aarch64 targets");

/// CPU architecture the binary was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    /// 64-bit x86
    X86_64,
    /// 64-bit ARM
    Aarch64,
}

impl Architecture {
    /// Architecture of this build
    #[cfg(target_arch = "x86_64")]
    pub const CURRENT: Self = Self::X86_64;

    /// Architecture of this build
    #[cfg(target_arch = "aarch64")]
    pub const CURRENT: Self = Self::Aarch64;

    /// Name used in requests and user-facing output
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
