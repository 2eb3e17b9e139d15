/// Errors reported by the coprocessor driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// Payload does not fit the staging buffer; hardware was not touched.
    ResourceExhausted,
    /// Copy across the trust boundary failed.
    BoundaryFault,
    /// User register index outside the user register range.
    AccessDenied,
    /// Unrecognized control operation.
    InvalidArgument,
    /// Register window or platform configuration unusable.
    DeviceNotReady,
    /// Device did not finish copying within the poll budget.
    Timeout,
    /// Device copied more bytes than the receiving buffer or staging buffer can
    /// hold. The output FIFO was already drained and nothing was delivered.
    Truncated { available: usize, capacity: usize },
}

impl DriverError {
    /// Negative errno as returned through a character device.
    pub const fn errno(&self) -> i32 {
        match self {
            DriverError::ResourceExhausted => -12, // ENOMEM
            DriverError::BoundaryFault => -14,     // EFAULT
            DriverError::AccessDenied => -13,      // EACCES
            DriverError::InvalidArgument => -22,   // EINVAL
            DriverError::DeviceNotReady => -19,    // ENODEV
            DriverError::Timeout => -110,          // ETIMEDOUT
            DriverError::Truncated { .. } => -75,  // EOVERFLOW
        }
    }
}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DriverError::ResourceExhausted => write!(f, "staging buffer capacity exceeded"),
            DriverError::BoundaryFault => write!(f, "copy across trust boundary failed"),
            DriverError::AccessDenied => write!(f, "user register index out of range"),
            DriverError::InvalidArgument => write!(f, "unrecognized control operation"),
            DriverError::DeviceNotReady => write!(f, "device not ready"),
            DriverError::Timeout => write!(f, "device did not finish copying in time"),
            DriverError::Truncated {
                available,
                capacity,
            } => write!(
                f,
                "device copied {available} bytes but buffer holds {capacity}"
            ),
        }
    }
}

pub type Result<T> = core::result::Result<T, DriverError>;
