use std::io::Write;
use std::path::Path;

use goldenfile::Mint;
use tempfile::NamedTempFile;

use crate::beancount::format_entries;
use crate::importers::importer::EntryImporter;

pub fn golden_test(importer: &dyn EntryImporter, input_path: &str, golden_path: &str) {
    let mut mint = Mint::new("testdata/importers");
    let differ = Box::new(goldenfile::differs::text_diff);
    let mut out = mint
        .new_goldenfile_with_differ(golden_path, differ)
        .expect("new goldenfile");

    let input = Path::new(input_path);
    assert!(importer.identify(input).expect("identify input"));
    let entries = importer
        .extract(input)
        .expect("perform import")
        .expect("input is a transactions file");

    out.write_all(format_entries(&entries).as_bytes())
        .expect("write output");
}

/// Writes `content` to a new temporary file whose name ends in `suffix`.
pub fn write_temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes())
        .expect("write temp file");
    file
}
