// intake-core/src/infrastructure/ddl.rs

use sqlparser::ast::Statement;
use sqlparser::dialect::DuckDbDialect;
use sqlparser::parser::Parser;
use tracing::warn;

/// A `CREATE TABLE` statement lifted from a DDL script.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    pub table: String,
    pub sql: String,
}

/// Splits a semicolon-delimited script and keeps only the statements that
/// parse as `CREATE TABLE`. The original text of each statement is kept so
/// the warehouse sees exactly what was written.
pub fn parse_create_tables(script: &str) -> Vec<CreateTableStatement> {
    let dialect = DuckDbDialect {};
    let mut statements = Vec::new();

    for raw in script.split(';') {
        let sql = raw.trim();
        if sql.is_empty() || is_comment_only(sql) {
            continue;
        }

        let parsed = match Parser::parse_sql(&dialect, sql) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Skipping unparsable DDL statement");
                continue;
            }
        };

        for statement in parsed {
            if let Statement::CreateTable(create) = statement {
                statements.push(CreateTableStatement {
                    table: unqualified(&create.name.to_string()),
                    sql: sql.to_string(),
                });
            }
        }
    }

    statements
}

fn is_comment_only(sql: &str) -> bool {
    sql.lines().all(|l| {
        let l = l.trim();
        l.is_empty() || l.starts_with("--")
    })
}

/// `"main"."orders"` -> `orders`
fn unqualified(name: &str) -> String {
    name.rsplit('.')
        .next()
        .unwrap_or(name)
        .trim_matches(|c| c == '"' || c == '`' || c == '[' || c == ']')
        .to_string()
}
