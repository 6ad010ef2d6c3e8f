use super::DateValue;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateValue>,
    #[serde(default)]
    pub end_date: Option<DateValue>,
    #[serde(default)]
    pub no_of_boards: Option<i64>,
    #[serde(default)]
    pub selected_boards: Vec<BoardRef>,
}

/// Boards are either populated by the API or left as bare ids.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum BoardRef {
    Id(String),
    Board(Board),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Board {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "BoardNo", default)]
    pub board_no: String,
    #[serde(rename = "Location", default)]
    pub location: String,
    #[serde(rename = "City", default)]
    pub city: String,
    #[serde(rename = "Latitude", default)]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude", default)]
    pub longitude: Option<f64>,
}

impl Campaign {
    pub fn client_email(&self) -> Option<&str> {
        self.client_email
            .as_deref()
            .map(str::trim)
            .filter(|it| !it.is_empty())
    }

    /// Zero boards reads as "unknown", same as a missing count.
    pub fn board_count(&self) -> Option<i64> {
        self.no_of_boards.filter(|it| *it != 0)
    }

    pub fn find_board(&self, id: &str) -> Option<&Board> {
        self.selected_boards.iter().find_map(|it| match it {
            BoardRef::Board(board) if board.id.as_deref() == Some(id) => Some(board),
            _ => None,
        })
    }

    #[cfg(test)]
    pub fn mock() -> Campaign {
        Campaign {
            id: Some("c1".into()),
            name: "Eid Drive".into(),
            client_email: Some("c@x.com".into()),
            start_date: Some("2025-01-01".into()),
            end_date: Some("2025-01-31".into()),
            no_of_boards: Some(2),
            selected_boards: vec![],
        }
    }
}

impl Board {
    pub fn label(&self) -> String {
        format!("{} - {}", self.board_no, self.location)
    }
}
