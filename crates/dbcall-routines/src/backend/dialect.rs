//! Procedure call syntax per database

/// Database dialect for procedure execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureDialect {
    /// PostgreSQL (CALL procedure, SELECT function)
    PostgreSQL,
    /// MySQL/MariaDB (CALL procedure)
    MySQL,
    /// SQLite (no native stored procedures)
    SQLite,
    /// Microsoft SQL Server (EXEC procedure)
    MsSql,
}

impl ProcedureDialect {
    /// Map a connection's dialect identifier
    pub fn from_dialect_id(id: &str) -> Option<Self> {
        match id {
            "postgresql" | "postgres" => Some(ProcedureDialect::PostgreSQL),
            "mysql" | "mariadb" => Some(ProcedureDialect::MySQL),
            "sqlite" => Some(ProcedureDialect::SQLite),
            "mssql" | "sqlserver" => Some(ProcedureDialect::MsSql),
            _ => None,
        }
    }

    /// Get the procedure call keyword for this dialect
    pub fn call_keyword(&self) -> &'static str {
        match self {
            ProcedureDialect::PostgreSQL | ProcedureDialect::MySQL => "CALL",
            ProcedureDialect::MsSql => "EXEC",
            ProcedureDialect::SQLite => "SELECT",
        }
    }

    /// Check if this dialect supports stored procedures
    pub fn supports_procedures(&self) -> bool {
        !matches!(self, ProcedureDialect::SQLite)
    }

    /// Positional placeholder for the `position`-th bound value (1-based)
    pub fn placeholder(&self, position: usize) -> String {
        match self {
            ProcedureDialect::PostgreSQL => format!("${}", position),
            ProcedureDialect::MySQL | ProcedureDialect::SQLite => "?".to_string(),
            ProcedureDialect::MsSql => format!("@p{}", position),
        }
    }
}
