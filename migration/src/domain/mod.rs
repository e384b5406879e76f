use std::str::FromStr;

use anyhow::anyhow;
use serde::Deserialize;

use crate::domain::tables::{
    Table, comments_table, news_table, notes_table, sessions_table, users_table,
};

pub mod migration;
pub mod persistence;
pub mod tables;

/// The application whose tables are migrated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Application {
    News,
    Notes,
}

impl Application {
    pub fn name(&self) -> &'static str {
        match self {
            Application::News => "news",
            Application::Notes => "notes",
        }
    }

    /// Tables in creation order, referenced tables come first
    pub fn tables(&self) -> Vec<Table> {
        let mut tables = vec![users_table(), sessions_table()];
        match self {
            Application::News => tables.extend([news_table(), comments_table()]),
            Application::Notes => tables.push(notes_table()),
        }
        tables
    }
}

impl FromStr for Application {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "news" => Ok(Application::News),
            "notes" => Ok(Application::Notes),
            other => Err(anyhow!("unknown application {:?}, expected news or notes", other)),
        }
    }
}
