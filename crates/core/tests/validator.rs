use vmlinux_core::looks_like_kernel_image;
use vmlinux_core::services::REJECTION_REASON;

#[test]
fn both_markers_are_required() {
    let kernel = b"             Linux  \n \n kernel/params.c \n ";
    assert!(looks_like_kernel_image(kernel, false));

    let missing_linux = b"             Lin  \n \n kernel/params.c \n ";
    assert!(!looks_like_kernel_image(missing_linux, false));

    let missing_params = b"Linux version 6.1.0 (builder@host)";
    assert!(!looks_like_kernel_image(missing_params, false));

    assert!(!looks_like_kernel_image(b"neither marker here", false));
}

#[test]
fn empty_input_is_rejected_unless_ignored() {
    assert!(!looks_like_kernel_image(b"", false));
    assert!(looks_like_kernel_image(b"", true));
}

#[test]
fn ignore_validation_accepts_anything() {
    assert!(looks_like_kernel_image(b"random junk", true));
    assert!(looks_like_kernel_image(&[0u8; 64], true));
}

#[test]
fn markers_at_start_of_buffer_count() {
    assert!(looks_like_kernel_image(b"Linuxkernel/params.c", false));
}

#[test]
fn rejection_reason_mentions_ignore_flag() {
    assert!(REJECTION_REASON.contains("-i"));
}
