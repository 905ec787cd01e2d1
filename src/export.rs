//! CSV export of the team list.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::registry::Team;

pub const HEADERS: [&str; 12] = [
    "#",
    "ID",
    "Team Name",
    "Contact Email",
    "Athlete 1",
    "Shirt A1",
    "Phone A1",
    "Athlete 2",
    "Shirt A2",
    "Phone A2",
    "Status",
    "Registered At",
];

pub const FILE_NAME: &str = "registrations.csv";

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("there are no registrations to export")]
    NoTeams,
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV output was not valid UTF-8")]
    Utf8,
}

/// Writes `teams` as CSV. The header line is unquoted; every field of
/// every row is quoted, with quotes inside fields doubled. Lines are
/// separated by `\n` and there is no trailing newline.
pub fn teams_to_csv(teams: &[Team]) -> Result<String, ExportError> {
    if teams.is_empty() {
        return Err(ExportError::NoTeams);
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for (i, team) in teams.iter().enumerate() {
        let [a1, a2] = &team.athletes;
        let (number, id, registered_at) =
            ((i + 1).to_string(), team.id.to_string(), team.registered_at());
        let record: [&str; 12] = [
            &number,
            &id,
            &team.team_name,
            &team.contact_email,
            &a1.name,
            a1.shirt_size.as_str(),
            &a1.phone,
            &a2.name,
            a2.shirt_size.as_str(),
            &a2.phone,
            team.status.as_str(),
            &registered_at,
        ];
        writer.write_record(record)?;
    }

    let rows = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    let rows = String::from_utf8(rows).map_err(|_| ExportError::Utf8)?;

    Ok(format!("{}\n{}", HEADERS.join(","), rows.trim_end_matches('\n')))
}
