pub const EXTENSION: &str = "pptx";

/// "Eid Drive" -> "eid_drive_report.pptx"
pub fn report_file_name(campaign_name: &str) -> String {
    let stem: String = campaign_name
        .chars()
        .map(|it| {
            if it.is_ascii_alphanumeric() {
                it.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}_report.{EXTENSION}")
}

/// Name used for the mail attachment: whitespace runs become a single '_'.
pub fn attachment_file_name(campaign_name: &str) -> String {
    let mut stem = String::with_capacity(campaign_name.len());
    let mut in_whitespace = false;
    for c in campaign_name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                stem.push('_');
            }
            in_whitespace = true;
        } else {
            stem.push(c);
            in_whitespace = false;
        }
    }
    format!("{stem}_Report.{EXTENSION}")
}

#[cfg(test)]
mod test {
    use super::{attachment_file_name, report_file_name};

    #[test]
    fn report_file_name_replaces_every_symbol() {
        assert_eq!("eid_drive_report.pptx", report_file_name("Eid Drive"));
        assert_eq!("eid_drive_2025__report.pptx", report_file_name("Eid Drive 2025!"));
        assert_eq!("caf___report.pptx", report_file_name("Café!"));
        assert_eq!("_report.pptx", report_file_name(""));
    }

    #[test]
    fn attachment_file_name_collapses_whitespace() {
        assert_eq!("Eid_Drive_Report.pptx", attachment_file_name("Eid  Drive"));
        assert_eq!("_Q1_Push!_Report.pptx", attachment_file_name(" Q1\tPush!"));
    }
}
