//! Vitamin consumption reports and hemoglobin trend endpoints.

// crates.io
use time::Date;
// self
use crate::{
	_prelude::*,
	api::{Envelope, endpoints},
	client::{ApiClient, RequestOptions},
	http::{HttpMethod, HttpTransport, MultipartForm, PhotoFile, ProgressCallback, RequestBody},
};

/// First page index used by paginated listings.
pub const INITIAL_PAGE: u32 = 1;
/// Default page size for report history.
pub const PAGE_SIZE: u32 = 10;
/// Trend window requested when the caller does not choose one.
pub const DEFAULT_TREND_PERIOD: &str = "7days";

/// Review state of a submitted report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
	/// Awaiting review.
	Pending,
	/// Accepted by school staff.
	Verified,
	/// Rejected by school staff.
	Rejected,
	/// Closed.
	Completed,
}
impl ReportStatus {
	/// Wire value used in query strings.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Pending => "pending",
			Self::Verified => "verified",
			Self::Rejected => "rejected",
			Self::Completed => "completed",
		}
	}

	/// Label shown to students.
	pub const fn label(self) -> &'static str {
		match self {
			Self::Pending => "Menunggu Verifikasi",
			Self::Verified => "Terverifikasi",
			Self::Rejected => "Ditolak",
			Self::Completed => "Selesai",
		}
	}
}
impl Display for ReportStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// A consumption report with its photo evidence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportSubmission {
	/// Day the vitamin was taken.
	pub date: Date,
	/// Free-form note.
	pub note: String,
	/// Photo evidence.
	pub photo: PhotoFile,
}
impl ReportSubmission {
	/// Builds the multipart form with `date` (`YYYY-MM-DD`), `note`, and `photo` fields.
	pub fn into_form(self) -> MultipartForm {
		let PhotoFile { file_name, mime, bytes } = self.photo;

		MultipartForm::new()
			.text("date", self.date.to_string())
			.text("note", self.note)
			.file("photo", file_name, mime, bytes)
	}
}

/// Vitamin report endpoints.
#[derive(Debug)]
pub struct ReportApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'a ApiClient<T>,
}
impl<'a, T> ReportApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
		Self { client }
	}

	/// Uploads a new report, reporting photo upload progress to `progress`.
	pub async fn submit_report(
		&self,
		submission: ReportSubmission,
		progress: Option<ProgressCallback>,
	) -> Result<JsonValue> {
		self.upload(endpoints::SUBMIT_REPORT, submission.into_form(), progress).await
	}

	/// Lists submitted reports; `None` lists every status.
	pub async fn report_history(
		&self,
		page: u32,
		limit: u32,
		status: Option<ReportStatus>,
	) -> Result<JsonValue> {
		let mut options = RequestOptions::new().query("page", page).query("limit", limit);

		if let Some(status) = status {
			options = options.query("status", status);
		}

		self.client.data(HttpMethod::Get, endpoints::REPORTS, RequestBody::Empty, options).await
	}

	/// Fetches one report.
	pub async fn report_detail(&self, id: &str) -> Result<JsonValue> {
		let path = endpoints::with_id(endpoints::REPORTS, id)?;

		self.client.data(HttpMethod::Get, &path, RequestBody::Empty, RequestOptions::new()).await
	}

	/// Fetches the hemoglobin trend series for a window such as `7days`.
	pub async fn hb_trend(&self, period: Option<&str>) -> Result<JsonValue> {
		let options = RequestOptions::new().query("period", period.unwrap_or(DEFAULT_TREND_PERIOD));

		self.client
			.data(HttpMethod::Get, endpoints::REPORT_TREND, RequestBody::Empty, options)
			.await
	}

	/// Replaces an existing report.
	pub async fn update_report(&self, id: &str, submission: ReportSubmission) -> Result<JsonValue> {
		let path = endpoints::with_id(endpoints::SUBMIT_REPORT, id)?;

		self.upload(&path, submission.into_form(), None).await
	}

	/// Deletes a report.
	pub async fn delete_report(&self, id: &str) -> Result<JsonValue> {
		let path = endpoints::with_id(endpoints::SUBMIT_REPORT, id)?;

		self.client.data(HttpMethod::Delete, &path, RequestBody::Empty, RequestOptions::new()).await
	}

	/// Detailed report listing for the signed-in student.
	pub async fn student_reports(&self) -> Result<JsonValue> {
		self.client
			.data(
				HttpMethod::Get,
				endpoints::STUDENT_REPORTS,
				RequestBody::Empty,
				RequestOptions::new(),
			)
			.await
	}

	/// Aggregated report statistics.
	pub async fn report_statistics(&self) -> Result<JsonValue> {
		self.client
			.data(
				HttpMethod::Get,
				endpoints::REPORT_STATISTICS,
				RequestBody::Empty,
				RequestOptions::new(),
			)
			.await
	}

	/// Downloads a report as PDF bytes.
	pub async fn download_report(&self, id: &str) -> Result<Vec<u8>> {
		let options = RequestOptions::new().header("accept", "application/pdf");
		let response = self
			.client
			.send(HttpMethod::Get, &endpoints::report_download(id)?, RequestBody::Empty, options)
			.await?;

		Ok(response.body)
	}

	async fn upload(
		&self,
		path: &str,
		form: MultipartForm,
		progress: Option<ProgressCallback>,
	) -> Result<JsonValue> {
		let payload: Envelope<JsonValue> = self.client.upload(path, form, progress).await?;

		Ok(payload.into_inner())
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::date;
	// self
	use super::*;
	use crate::http::PartData;

	#[test]
	fn submission_form_uses_iso_date_and_photo_part() {
		let submission = ReportSubmission {
			date: date!(2025 - 03 - 07),
			note: "Diminum setelah makan siang".into(),
			photo: PhotoFile::jpeg("photo.jpg", vec![7_u8; 16]),
		};
		let form = submission.into_form();

		assert_eq!(form.text_value("date"), Some("2025-03-07"));
		assert_eq!(form.text_value("note"), Some("Diminum setelah makan siang"));

		let photo = form
			.parts()
			.iter()
			.find(|part| part.name == "photo")
			.expect("Photo part should exist.");

		match &photo.data {
			PartData::File { file_name, mime, bytes } => {
				assert_eq!(file_name, "photo.jpg");
				assert_eq!(mime, "image/jpeg");
				assert_eq!(bytes.len(), 16);
			},
			other => panic!("Unexpected part data: {other:?}."),
		}
	}

	#[test]
	fn status_labels_and_wire_values() {
		assert_eq!(ReportStatus::Verified.to_string(), "verified");
		assert_eq!(ReportStatus::Pending.label(), "Menunggu Verifikasi");
		assert_eq!(
			serde_json::to_value(ReportStatus::Rejected).expect("Status should serialize."),
			serde_json::json!("rejected")
		);
	}
}
