//! Cheap "is this a Linux kernel?" heuristic.

use memchr::memmem;

/// Strings every mainline uncompressed kernel image carries: the banner
/// name and a compiled-in source path from the module-parameter code.
pub const KERNEL_MARKERS: [&[u8]; 2] = [b"Linux", b"kernel/params.c"];

/// Message attached to candidates that decode fine but fail the heuristic.
pub const REJECTION_REASON: &str =
    "Doesn't look like that was a valid Kernel Image, use -i to dump extracted content anyway";

/// True when `data` contains every kernel marker, or unconditionally when
/// `ignore_validation` is set.
///
/// False negatives (stripped kernels) are acceptable; requiring both
/// markers keeps false positives rare.
pub fn looks_like_kernel_image(data: &[u8], ignore_validation: bool) -> bool {
    if ignore_validation {
        return true;
    }
    KERNEL_MARKERS.iter().all(|marker| memmem::find(data, marker).is_some())
}
