/// Extensions the generic (`image` crate backed) handler can decode and encode.
pub const GENERIC_EXTENSIONS: [&str; 9] = [
	"bmp", "gif", "ico", "jpeg", "jpg", "png", "tif", "tiff", "webp",
];

/// The maximum file size that an image can be in order to have a thumbnail generated.
///
/// This value is in MiB.
pub(crate) const GENERIC_MAXIMUM_FILE_SIZE: u64 = MIB * 24;

/// Quality used when the output is a JPEG file, between 1 and 100.
pub const JPEG_QUALITY: u8 = 80;

/// The size of 1MiB in bytes
const MIB: u64 = 1_048_576;
