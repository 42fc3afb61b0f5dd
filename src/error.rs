//! Error type for fallible reservation.

use core::alloc::Layout;

/// Failure to grow a [`Vector`](crate::Vector) buffer.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TryReserveError {
    /// The requested capacity does not fit in `isize::MAX` bytes.
    #[error("capacity overflow")]
    CapacityOverflow,

    /// The global allocator returned null for this layout.
    #[error("memory allocation of {} bytes failed", .layout.size())]
    AllocError { layout: Layout },
}

impl TryReserveError {
    /// Terminates the way an infallible reservation would.
    pub(crate) fn handle(self) -> ! {
        match self {
            Self::CapacityOverflow => panic!("capacity overflow"),
            Self::AllocError { layout } => alloc::alloc::handle_alloc_error(layout),
        }
    }
}
