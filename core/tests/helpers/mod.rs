#![allow(dead_code)]

use vh_core::{ImageSize, ProducerError, Production, ThumbnailProducer};

use std::{
	io::Cursor,
	sync::{
		atomic::{AtomicBool, Ordering},
		Mutex,
	},
};

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// Records every production instead of writing images, optionally failing
#[derive(Debug, Default)]
pub struct FakeProducer {
	calls: Mutex<Vec<(Production, ImageSize)>>,
	fail: AtomicBool,
}

impl FakeProducer {
	pub fn failing() -> Self {
		let producer = Self::default();
		producer.set_failing(true);
		producer
	}

	pub fn set_failing(&self, fail: bool) {
		self.fail.store(fail, Ordering::SeqCst);
	}

	pub fn calls(&self) -> Vec<(Production, ImageSize)> {
		self.calls.lock().unwrap().clone()
	}
}

#[async_trait]
impl ThumbnailProducer for FakeProducer {
	async fn produce(&self, production: &Production, size: ImageSize) -> Result<(), ProducerError> {
		self.calls.lock().unwrap().push((production.clone(), size));

		if self.fail.load(Ordering::SeqCst) {
			Err(ProducerError::other("producer exploded"))
		} else {
			Ok(())
		}
	}
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
	let mut bytes = Vec::new();
	DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([12, 120, 240])))
		.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
		.unwrap();
	bytes
}
