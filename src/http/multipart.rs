//! Re-sendable multipart payloads and upload progress reporting.

// self
use crate::_prelude::*;

/// Callback invoked as upload bytes are handed to the transport.
pub type ProgressCallback = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// Snapshot of an in-flight upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadProgress {
	/// File bytes handed to the transport so far.
	pub sent: u64,
	/// Total file bytes in the form.
	pub total: u64,
}
impl UploadProgress {
	/// Completion percentage rounded to the nearest whole number.
	pub fn percent(&self) -> u8 {
		if self.total == 0 {
			return 100;
		}

		let ratio = (self.sent.min(self.total) as f64 * 100.0 / self.total as f64).round();

		ratio as u8
	}
}

/// Multipart form held as owned parts so a rejected upload can be resubmitted after refresh.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultipartForm {
	parts: Vec<MultipartPart>,
}
impl MultipartForm {
	/// Creates an empty form.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a text field.
	pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.parts.push(MultipartPart { name: name.into(), data: PartData::Text(value.into()) });

		self
	}

	/// Appends a file field.
	pub fn file(
		mut self,
		name: impl Into<String>,
		file_name: impl Into<String>,
		mime: impl Into<String>,
		bytes: impl Into<Vec<u8>>,
	) -> Self {
		self.parts.push(MultipartPart {
			name: name.into(),
			data: PartData::File {
				file_name: file_name.into(),
				mime: mime.into(),
				bytes: bytes.into(),
			},
		});

		self
	}

	/// Parts in insertion order.
	pub fn parts(&self) -> &[MultipartPart] {
		&self.parts
	}

	/// Consumes the form, yielding its parts in insertion order.
	pub(crate) fn into_parts(self) -> Vec<MultipartPart> {
		self.parts
	}

	/// Total file bytes, the denominator of [`UploadProgress`].
	pub fn file_bytes(&self) -> u64 {
		self.parts
			.iter()
			.map(|part| match &part.data {
				PartData::File { bytes, .. } => bytes.len() as u64,
				PartData::Text(_) => 0,
			})
			.sum()
	}

	/// Looks up the first text field with the given name.
	pub fn text_value(&self, name: &str) -> Option<&str> {
		self.parts.iter().find_map(|part| match &part.data {
			PartData::Text(value) if part.name == name => Some(value.as_str()),
			_ => None,
		})
	}
}

/// One named field in a [`MultipartForm`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultipartPart {
	/// Field name.
	pub name: String,
	/// Field content.
	pub data: PartData,
}

/// Content of a [`MultipartPart`].
#[derive(Clone, PartialEq, Eq)]
pub enum PartData {
	/// Plain text value.
	Text(String),
	/// Binary file content.
	File {
		/// File name advertised to the server.
		file_name: String,
		/// MIME type of the content.
		mime: String,
		/// File content.
		bytes: Vec<u8>,
	},
}
impl Debug for PartData {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Text(value) => f.debug_tuple("Text").field(value).finish(),
			Self::File { file_name, mime, bytes } => f
				.debug_struct("File")
				.field("file_name", file_name)
				.field("mime", mime)
				.field("len", &bytes.len())
				.finish(),
		}
	}
}

/// A photo picked from the device, ready to attach to a form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhotoFile {
	/// File name advertised to the server.
	pub file_name: String,
	/// MIME type of the image.
	pub mime: String,
	/// Image content.
	pub bytes: Vec<u8>,
}
impl PhotoFile {
	/// Fallback MIME type when the picker reports none.
	pub const DEFAULT_MIME: &'static str = "image/jpeg";

	/// Wraps image bytes, defaulting the MIME type to JPEG.
	pub fn jpeg(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
		Self { file_name: file_name.into(), mime: Self::DEFAULT_MIME.into(), bytes: bytes.into() }
	}

	/// Overrides the MIME type.
	pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
		self.mime = mime.into();

		self
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn progress_percent_is_clamped_and_rounded() {
		assert_eq!(UploadProgress { sent: 0, total: 0 }.percent(), 100);
		assert_eq!(UploadProgress { sent: 1, total: 3 }.percent(), 33);
		assert_eq!(UploadProgress { sent: 2, total: 3 }.percent(), 67);
		assert_eq!(UploadProgress { sent: 9, total: 3 }.percent(), 100);
	}

	#[test]
	fn form_counts_only_file_bytes() {
		let form = MultipartForm::new()
			.text("date", "2025-11-10")
			.text("note", "setelah sarapan")
			.file("photo", "photo.jpg", "image/jpeg", vec![0_u8; 1024]);

		assert_eq!(form.parts().len(), 3);
		assert_eq!(form.file_bytes(), 1024);
		assert_eq!(form.text_value("note"), Some("setelah sarapan"));
		assert_eq!(form.text_value("photo"), None);

		let names: Vec<_> = form.into_parts().into_iter().map(|part| part.name).collect();

		assert_eq!(names, ["date", "note", "photo"]);
	}

	#[test]
	fn file_debug_omits_content() {
		let form = MultipartForm::new().file("photo", "p.png", "image/png", b"\x89PNG".to_vec());
		let rendered = format!("{form:?}");

		assert!(rendered.contains("len: 4"));
		assert!(!rendered.contains("137"));
	}
}
