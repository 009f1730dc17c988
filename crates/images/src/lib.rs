#![warn(
	clippy::all,
	clippy::pedantic,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::complexity,
	clippy::nursery,
	clippy::unwrap_used,
	unused_qualifications,
	rust_2018_idioms,
	clippy::expect_used,
	trivial_casts,
	trivial_numeric_casts,
	unused_allocation,
	clippy::dbg_macro
)]
#![forbid(unsafe_code)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

mod consts;
mod error;
mod formatter;
mod generic;
mod process;

pub use consts::{GENERIC_EXTENSIONS, JPEG_QUALITY};
pub use error::{Error, Result};
pub use formatter::{format_image, is_supported_extension};
pub use image::DynamicImage;
pub use process::{process_image, resize_to_fill, write_image};

use std::{fs, io::Read, path::Path};

use vh_utils::error::FileIOError;

pub trait ImageHandler {
	fn maximum_size(&self) -> u64;

	fn get_data(&self, path: &Path) -> Result<Vec<u8>> {
		let mut file = fs::File::open(path).map_err(|e| FileIOError::from((path, e)))?;
		let len = file
			.metadata()
			.map_err(|e| FileIOError::from((path, e)))?
			.len();

		if len > self.maximum_size() {
			Err(Error::TooLarge(len))
		} else {
			let mut data = vec![];
			file.read_to_end(&mut data)
				.map_err(|e| FileIOError::from((path, e)))?;
			Ok(data)
		}
	}

	fn handle_image(&self, path: &Path) -> Result<DynamicImage>;
}
