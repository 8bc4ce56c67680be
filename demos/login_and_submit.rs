//! Signs a student in against a mocked backend, submits a daily report with upload progress,
//! and shows how a failing call is flattened for the UI layer.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use time::macros::date;
// self
use modiva_client::{
	api::ReportSubmission,
	auth::{SchoolId, StudentId},
	client::{ApiClient, ReqwestApiClient},
	config::ClientConfig,
	http::{PhotoFile, ProgressCallback, ReqwestTransport, UploadProgress},
	reqwest::Client,
	session::Session,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/auth/login/siswi");
			then.status(200).json_body(json!({
				"data": {
					"access_token": "demo-access",
					"refresh_token": "demo-refresh",
					"user": { "name": "Siti Aminah", "class": "XI IPA 2" },
				}
			}));
		})
		.await;
	let submit = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/report/submit")
				.header("authorization", "Bearer demo-access");
			then.status(201).json_body(json!({ "data": { "id": 42, "status": "pending" } }));
		})
		.await;
	let _outage = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/notifications/unread-count");
			then.status(503).json_body(json!({ "message": "Layanan sedang dalam pemeliharaan." }));
		})
		.await;
	let config = ClientConfig::builder()
		.base_url(format!("{}/v1", server.base_url()))
		.user_agent("modiva-demo")
		.build()?;
	let transport = ReqwestTransport::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.user_agent("modiva-demo")
			.build()?,
	);
	let client: ReqwestApiClient =
		ApiClient::with_transport(config, Session::in_memory(), transport);
	let user = client
		.auth()
		.login(&StudentId::new("1234567890")?, &SchoolId::new("SCH001")?)
		.await?;

	println!("Signed in as {}.", user["name"]);

	let progress: ProgressCallback = Arc::new(|update: UploadProgress| {
		println!("Uploading photo: {}%.", update.percent());
	});
	let submission = ReportSubmission {
		date: date!(2025 - 11 - 10),
		note: "Diminum setelah sarapan".into(),
		photo: PhotoFile::jpeg("tablet.jpg", vec![0xFF_u8; 150 * 1024]),
	};
	let report = client.reports().submit_report(submission, Some(progress)).await?;

	println!("Report {} is {}.", report["id"], report["status"]);

	match client.notifications().unread_count().await {
		Ok(count) => println!("Unread notifications: {count}."),
		Err(e) => println!("Request failed: {}.", serde_json::to_string(&e.normalized())?),
	}

	login.assert_async().await;
	submit.assert_async().await;

	Ok(())
}
