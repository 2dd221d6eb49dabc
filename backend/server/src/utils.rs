/// A file counts as CSV when either its declared MIME type says so or its
/// name carries a `.csv` extension, case-insensitive. No content sniffing.
pub fn is_csv_file(name: &str, content_type: Option<&str>) -> bool {
    if content_type == Some("text/csv") {
        return true;
    }

    name.to_lowercase().ends_with(".csv")
}
