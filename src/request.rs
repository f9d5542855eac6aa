//! Submission inputs and their form-field encoding.

use crate::JobStatus;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use std::path::Path;

/// A document to upload: a PDF, or Finvoice XML for [`Client::send_finvoice`](crate::Client::send_finvoice).
///
/// The service only accepts documents as base64 text; [`Document::to_base64`]
/// is exactly what goes on the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    bytes: Vec<u8>,
}

impl Document {
    /// Wrap raw document bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Read a document from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        Ok(Self { bytes })
    }

    /// The original, unencoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Standard-alphabet, padded base64 of the document bytes.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl From<Vec<u8>> for Document {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for Document {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

/// Postage class, selecting delivery speed and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostClass {
    /// 1st class, black and white.
    FirstClass = 1,
    /// 2nd class, black and white.
    SecondClass = 2,
    /// 1st class, color.
    FirstClassColor = 3,
    /// 2nd class, color.
    SecondClassColor = 4,
}

impl PostClass {
    /// Value sent in the `post_class` field.
    pub fn as_number(self) -> u8 {
        self as u8
    }
}

/// Optional parameters for [`Client::send`](crate::Client::send) and
/// [`Client::send_with_address`](crate::Client::send_with_address).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Groups the job into a separate billing report.
    pub report_group_id: Option<String>,
    pub post_class: Option<PostClass>,
    /// Split the PDF into separate letters of this many pages each.
    ///
    /// The source PDF must carry address data at the start of every chunk.
    pub pdf_splitter: Option<u32>,
}

impl SendOptions {
    /// No options set; only `job_name` and the document are sent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the job to a separate billing report.
    pub fn report_group_id(mut self, id: impl Into<String>) -> Self {
        self.report_group_id = Some(id.into());
        self
    }

    /// Choose the postage class. The account default applies when unset.
    pub fn post_class(mut self, class: PostClass) -> Self {
        self.post_class = Some(class);
        self
    }

    /// Split the PDF into letters of `pages` pages each.
    pub fn pdf_splitter(mut self, pages: u32) -> Self {
        self.pdf_splitter = Some(pages);
        self
    }

    fn push_fields(&self, fields: &mut Vec<(&'static str, String)>) {
        if let Some(id) = &self.report_group_id {
            fields.push(("report_group_id", id.clone()));
        }
        if let Some(class) = self.post_class {
            fields.push(("post_class", class.as_number().to_string()));
        }
        if let Some(pages) = self.pdf_splitter {
            fields.push(("pdf_splitter", pages.to_string()));
        }
    }
}

/// Optional parameters for [`Client::send_finvoice`](crate::Client::send_finvoice).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinvoiceOptions {
    /// PDF rendering of the invoice. Without it the service generates one from
    /// the XML. The XML may then contain only a single invoice.
    pub invoice_pdf: Option<Document>,
    /// `Some(false)` keeps the job unconfirmed. The service confirms by default.
    pub confirm: Option<bool>,
}

impl FinvoiceOptions {
    /// No options set; the service renders the PDF and confirms the job.
    pub fn new() -> Self {
        Self::default()
    }

    /// Send this PDF instead of letting the service render one from the XML.
    pub fn invoice_pdf(mut self, pdf: impl Into<Document>) -> Self {
        self.invoice_pdf = Some(pdf.into());
        self
    }

    /// Pass `false` to leave the job unconfirmed.
    pub fn confirm(mut self, confirm: bool) -> Self {
        self.confirm = Some(confirm);
        self
    }

    fn push_fields(&self, fields: &mut Vec<(&'static str, String)>) {
        if let Some(pdf) = &self.invoice_pdf {
            fields.push(("invoice_pdf", pdf.to_base64()));
        }
        if let Some(confirm) = self.confirm {
            let value = if confirm { "True" } else { "False" };
            fields.push(("confirm", value.to_string()));
        }
    }
}

/// Recipient printed on the cover page added by
/// [`Client::send_with_address`](crate::Client::send_with_address).
///
/// Lines may be empty, but the country line should always be filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub name1: String,
    pub name2: String,
    pub address1: String,
    pub address2: String,
    /// Postal code and city.
    pub zipcity: String,
    pub country: String,
}

impl Address {
    fn push_fields(&self, fields: &mut Vec<(&'static str, String)>) {
        fields.push(("name1", self.name1.clone()));
        fields.push(("name2", self.name2.clone()));
        fields.push(("address1", self.address1.clone()));
        fields.push(("address2", self.address2.clone()));
        fields.push(("zipcity", self.zipcity.clone()));
        fields.push(("country", self.country.clone()));
    }
}

/// Selects which jobs [`Client::list_jobs`](crate::Client::list_jobs) returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobFilter {
    /// Jobs created after this date.
    CreatedAfter(NaiveDate),
    /// Jobs with this status code. Forwarded verbatim; the server rejects unknown codes.
    Status(String),
}

impl JobFilter {
    /// Path segment sent to `job_info/{filter}`.
    pub fn to_path_segment(&self) -> String {
        match self {
            JobFilter::CreatedAfter(date) => date.format("%d.%m.%Y").to_string(),
            JobFilter::Status(code) => code.clone(),
        }
    }
}

impl From<NaiveDate> for JobFilter {
    fn from(date: NaiveDate) -> Self {
        JobFilter::CreatedAfter(date)
    }
}

impl From<JobStatus> for JobFilter {
    fn from(status: JobStatus) -> Self {
        JobFilter::Status(status.as_code().to_string())
    }
}

impl From<&str> for JobFilter {
    fn from(code: &str) -> Self {
        JobFilter::Status(code.to_string())
    }
}

impl From<String> for JobFilter {
    fn from(code: String) -> Self {
        JobFilter::Status(code)
    }
}

/// Form fields for `send`.
pub(crate) fn send_fields(
    job_name: &str,
    pdf: &Document,
    options: &SendOptions,
) -> Vec<(&'static str, String)> {
    let mut fields = vec![("job_name", job_name.to_string()), ("pdf", pdf.to_base64())];
    options.push_fields(&mut fields);
    fields
}

/// Form fields for `send_with_address`.
pub(crate) fn send_with_address_fields(
    job_name: &str,
    pdf: &Document,
    address: &Address,
    options: &SendOptions,
) -> Vec<(&'static str, String)> {
    let mut fields = vec![("job_name", job_name.to_string()), ("pdf", pdf.to_base64())];
    address.push_fields(&mut fields);
    options.push_fields(&mut fields);
    fields
}

/// Form fields for `send_finvoice`.
pub(crate) fn send_finvoice_fields(
    job_name: &str,
    finvoice: &Document,
    options: &FinvoiceOptions,
) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("job_name", job_name.to_string()),
        ("finvoice", finvoice.to_base64()),
    ];
    options.push_fields(&mut fields);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(fields: &[(&'static str, String)]) -> Vec<&'static str> {
        fields.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn base64_round_trips_document_bytes() {
        let raw: Vec<u8> = (0..=255u8).collect();
        let doc = Document::new(raw.clone());
        let decoded = STANDARD.decode(doc.to_base64()).unwrap();
        assert_eq!(decoded, raw);
    }

    #[test]
    fn send_with_post_class_has_exact_fields() {
        let doc = Document::new(b"%PDF-1.4 test".to_vec());
        let options = SendOptions::new().post_class(PostClass::FirstClassColor);

        let fields = send_fields("Q1 invoices", &doc, &options);

        assert_eq!(
            fields,
            vec![
                ("job_name", "Q1 invoices".to_string()),
                ("pdf", "JVBERi0xLjQgdGVzdA==".to_string()),
                ("post_class", "3".to_string()),
            ]
        );
    }

    #[test]
    fn default_options_add_nothing() {
        let doc = Document::new(b"x".to_vec());
        let fields = send_fields("plain", &doc, &SendOptions::default());
        assert_eq!(keys(&fields), vec!["job_name", "pdf"]);
    }

    #[test]
    fn all_send_options_are_named_by_field() {
        let doc = Document::new(b"x".to_vec());
        let options = SendOptions::new()
            .report_group_id("agency-7")
            .post_class(PostClass::SecondClass)
            .pdf_splitter(4);

        let fields = send_fields("batch", &doc, &options);

        assert_eq!(
            &fields[2..],
            &[
                ("report_group_id", "agency-7".to_string()),
                ("post_class", "2".to_string()),
                ("pdf_splitter", "4".to_string()),
            ]
        );
    }

    #[test]
    fn address_fields_follow_document() {
        let doc = Document::new(b"x".to_vec());
        let address = Address {
            name1: "Matti Meikäläinen".into(),
            name2: String::new(),
            address1: "Mannerheimintie 1".into(),
            address2: String::new(),
            zipcity: "00100 Helsinki".into(),
            country: "Finland".into(),
        };

        let fields = send_with_address_fields(
            "letter",
            &doc,
            &address,
            &SendOptions::new().pdf_splitter(2),
        );

        assert_eq!(
            keys(&fields),
            vec![
                "job_name",
                "pdf",
                "name1",
                "name2",
                "address1",
                "address2",
                "zipcity",
                "country",
                "pdf_splitter",
            ]
        );
        assert_eq!(fields[6].1, "00100 Helsinki");
    }

    #[test]
    fn finvoice_uses_its_own_document_field() {
        let xml = Document::new(b"<Finvoice/>".to_vec());
        let pdf = Document::new(b"%PDF".to_vec());
        let options = FinvoiceOptions::new().invoice_pdf(pdf.clone()).confirm(false);

        let fields = send_finvoice_fields("invoices", &xml, &options);

        assert_eq!(
            fields,
            vec![
                ("job_name", "invoices".to_string()),
                ("finvoice", xml.to_base64()),
                ("invoice_pdf", pdf.to_base64()),
                ("confirm", "False".to_string()),
            ]
        );
    }

    #[test]
    fn date_filter_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2023, 3, 5).unwrap();
        assert_eq!(JobFilter::from(date).to_path_segment(), "05.03.2023");

        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(JobFilter::from(date).to_path_segment(), "31.12.2024");
    }

    #[test]
    fn status_filter_passes_through() {
        assert_eq!(JobFilter::from("NE").to_path_segment(), "NE");
        assert_eq!(JobFilter::from("bogus").to_path_segment(), "bogus");
        assert_eq!(JobFilter::from(JobStatus::Sent).to_path_segment(), "SE");
    }

    #[tokio::test]
    async fn missing_document_file_is_io_error() {
        let result = Document::from_path("/nonexistent/postita/letter.pdf").await;
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }

    #[tokio::test]
    async fn document_from_path_reads_bytes() {
        let path = std::env::temp_dir().join(format!("postita-doc-{}.pdf", std::process::id()));
        tokio::fs::write(&path, b"%PDF-1.4 test").await.unwrap();

        let doc = Document::from_path(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(doc.as_bytes(), b"%PDF-1.4 test");
    }

    #[test]
    fn document_debug_hides_contents() {
        let doc = Document::new(b"secret invoice".to_vec());
        assert_eq!(format!("{doc:?}"), "Document { len: 14 }");
    }
}
