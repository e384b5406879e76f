use std::fmt::{Display, Formatter};

use bulletin_common::{
    CREATED_FIELD_NAME, DATE_JOINED_FIELD_NAME, ID_FIELD_NAME, PASSWORD_FIELD_NAME,
    SESSIONS_TABLE_NAME, TOKEN_FIELD_NAME, USER_ID_FIELD_NAME, USERNAME_FIELD_NAME,
    USERS_TABLE_NAME,
};

pub const NEWS_TABLE_NAME: &str = "news";
pub const COMMENTS_TABLE_NAME: &str = "comments";
pub const NOTES_TABLE_NAME: &str = "notes";

/// Represents table in a database, used for ddl generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKeyConstraint>,
    pub indexes: Vec<Index>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    BigSerial,
    BigInt,
    Varchar(usize),
    Text,
    Date,
    TimestampTz,
    Uuid,
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::BigSerial => write!(f, "BIGSERIAL"),
            ColumnType::BigInt => write!(f, "BIGINT"),
            ColumnType::Varchar(length) => write!(f, "VARCHAR({})", length),
            ColumnType::Text => write!(f, "TEXT"),
            ColumnType::Date => write!(f, "DATE"),
            ColumnType::TimestampTz => write!(f, "TIMESTAMPTZ"),
            ColumnType::Uuid => write!(f, "UUID"),
        }
    }
}

/// Represents one column in the database table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub not_null: bool,
    pub unique: bool,
    pub primary_key: bool,
    pub default_value: Option<String>,
}

/// Represents foreign key constraint in the database table, rows go with the referenced row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyConstraint {
    pub table_name: String,
    pub column_name: String,
    pub referenced_table_name: String,
    pub referenced_column_name: String,
}

/// Represents an index in the database table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub table_name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl Table {
    pub fn new(
        name: impl Into<String>,
        columns: Vec<Column>,
        foreign_keys: Vec<ForeignKeyConstraint>,
        indexes: Vec<Index>,
    ) -> Self {
        Self {
            name: name.into(),
            columns,
            foreign_keys,
            indexes,
        }
    }
}

impl Column {
    /// A NOT NULL column
    pub fn required(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            not_null: true,
            unique: false,
            primary_key: false,
            default_value: None,
        }
    }

    pub fn primary_key(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            not_null: false,
            unique: false,
            primary_key: true,
            default_value: None,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

impl ForeignKeyConstraint {
    pub fn new(
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        referenced_table_name: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
            referenced_table_name: referenced_table_name.into(),
            referenced_column_name: ID_FIELD_NAME.to_string(),
        }
    }
}

impl Index {
    pub fn new(table_name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            table_name: table_name.into(),
            columns: columns.iter().map(|column| column.to_string()).collect(),
            unique: false,
        }
    }
}

fn id_column() -> Column {
    Column::primary_key(ID_FIELD_NAME, ColumnType::BigSerial)
}

pub fn users_table() -> Table {
    Table::new(
        USERS_TABLE_NAME,
        vec![
            id_column(),
            Column::required(USERNAME_FIELD_NAME, ColumnType::Varchar(150)).unique(),
            Column::required(PASSWORD_FIELD_NAME, ColumnType::Text),
            Column::required(DATE_JOINED_FIELD_NAME, ColumnType::TimestampTz).default_value("now()"),
        ],
        Vec::new(),
        Vec::new(),
    )
}

pub fn sessions_table() -> Table {
    Table::new(
        SESSIONS_TABLE_NAME,
        vec![
            Column::primary_key(TOKEN_FIELD_NAME, ColumnType::Uuid),
            Column::required(USER_ID_FIELD_NAME, ColumnType::BigInt),
            Column::required(CREATED_FIELD_NAME, ColumnType::TimestampTz).default_value("now()"),
        ],
        vec![ForeignKeyConstraint::new(
            SESSIONS_TABLE_NAME,
            USER_ID_FIELD_NAME,
            USERS_TABLE_NAME,
        )],
        vec![Index::new(SESSIONS_TABLE_NAME, &[USER_ID_FIELD_NAME])],
    )
}

pub fn news_table() -> Table {
    Table::new(
        NEWS_TABLE_NAME,
        vec![
            id_column(),
            Column::required("title", ColumnType::Varchar(50)),
            Column::required("text", ColumnType::Text),
            Column::required("date", ColumnType::Date).default_value("CURRENT_DATE"),
        ],
        Vec::new(),
        vec![Index::new(NEWS_TABLE_NAME, &["date"])],
    )
}

pub fn comments_table() -> Table {
    Table::new(
        COMMENTS_TABLE_NAME,
        vec![
            id_column(),
            Column::required("news_id", ColumnType::BigInt),
            Column::required("author_id", ColumnType::BigInt),
            Column::required("text", ColumnType::Text),
            Column::required("created", ColumnType::TimestampTz).default_value("now()"),
        ],
        vec![
            ForeignKeyConstraint::new(COMMENTS_TABLE_NAME, "news_id", NEWS_TABLE_NAME),
            ForeignKeyConstraint::new(COMMENTS_TABLE_NAME, "author_id", USERS_TABLE_NAME),
        ],
        vec![Index::new(COMMENTS_TABLE_NAME, &["news_id", "created"])],
    )
}

pub fn notes_table() -> Table {
    Table::new(
        NOTES_TABLE_NAME,
        vec![
            id_column(),
            Column::required("title", ColumnType::Varchar(100)),
            Column::required("text", ColumnType::Text),
            Column::required("slug", ColumnType::Varchar(100)).unique(),
            Column::required("author_id", ColumnType::BigInt),
        ],
        vec![ForeignKeyConstraint::new(
            NOTES_TABLE_NAME,
            "author_id",
            USERS_TABLE_NAME,
        )],
        vec![Index::new(NOTES_TABLE_NAME, &["author_id"])],
    )
}
