use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const CONFIG: &str = "\
name: olist_mini
warehouse:
  path: warehouse.duckdb
ddl_path: ddl/warehouse.sql
remote:
  resources: []
relationships:
  - { child: orders, column: customer_id, parent: customers, parent_column: customer_id }
  - { child: order_payments, column: order_id, parent: orders, parent_column: order_id }
load_order: [customers, orders, order_payments]
";

const DDL: &str = "
-- mini olist warehouse
CREATE TABLE IF NOT EXISTS customers (
    customer_id VARCHAR PRIMARY KEY,
    customer_city VARCHAR
);
CREATE TABLE IF NOT EXISTS orders (
    order_id VARCHAR PRIMARY KEY,
    customer_id VARCHAR,
    order_purchase_timestamp VARCHAR,
    order_approved_at VARCHAR,
    order_delivered_carrier_date VARCHAR,
    order_delivered_customer_date VARCHAR
);
CREATE TABLE IF NOT EXISTS order_payments (
    order_id VARCHAR,
    payment_sequential INTEGER,
    payment_value DOUBLE,
    PRIMARY KEY (order_id, payment_sequential)
);
";

/// A throwaway project: config, DDL and three raw CSV files.
struct IntakeTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl IntakeTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().join("olist_mini");
        let raw = root.join("data/raw");
        fs::create_dir_all(&raw)?;
        fs::create_dir_all(root.join("ddl"))?;

        fs::write(root.join("intake.yaml"), CONFIG)?;
        fs::write(root.join("ddl/warehouse.sql"), DDL)?;
        fs::write(
            raw.join("olist_customers_dataset.csv"),
            "customer_id,customer_city\nc1,rio\nc2,sao paulo\nc3,\n",
        )?;
        fs::write(
            raw.join("olist_orders_dataset.csv"),
            "order_id,customer_id,order_purchase_timestamp,order_approved_at,order_delivered_carrier_date,order_delivered_customer_date\n\
             o1,c1,2018-01-01 10:00:00,2018-01-01 11:00:00,2018-01-02 09:00:00,2018-01-05 09:00:00\n\
             o2,c2,2018-01-03 10:00:00,2018-01-03 10:30:00,2018-01-04 09:00:00,2018-01-08 09:00:00\n\
             ,c1,2018-01-01 10:00:00,2018-01-01 11:00:00,2018-01-02 09:00:00,2018-01-05 09:00:00\n\
             o4,c404,2018-01-01 10:00:00,2018-01-01 11:00:00,2018-01-02 09:00:00,2018-01-05 09:00:00\n",
        )?;
        fs::write(
            raw.join("olist_order_payments_dataset.csv"),
            "order_id,payment_sequential,payment_value\no1,1,10.5\no2,1,20.0\no4,1,99.9\n",
        )?;

        Ok(Self { _tmp: tmp, root })
    }

    fn intake(&self) -> Command {
        let mut cmd = intake_bin();
        cmd.current_dir(&self.root);
        cmd
    }

    fn count(&self, table: &str) -> Result<i64> {
        let conn = duckdb::Connection::open(self.root.join("warehouse.duckdb"))?;
        let count = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }

    fn lines(&self, relative: &str) -> Result<Vec<String>> {
        let content = fs::read_to_string(self.root.join(relative))?;
        Ok(content.lines().map(String::from).collect())
    }
}

fn intake_bin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("intake"))
}

fn exists(root: &Path, relative: &str) -> bool {
    root.join(relative).exists()
}

#[test]
fn test_init_run_and_rerun() -> Result<()> {
    let env = IntakeTestEnv::new()?;

    env.intake()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 created"));

    env.intake()
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS"));

    // null order_id and the dangling c404 order are gone, o4's payment cascades out
    assert_eq!(env.count("customers")?, 3);
    assert_eq!(env.count("orders")?, 2);
    assert_eq!(env.count("order_payments")?, 2);

    let pks = env.lines("logs/invalid_pks.csv")?;
    assert_eq!(pks[0], "Table Name,Error Type,Affected Records Count,Error Details,Timestamp");
    assert!(pks[1].starts_with("orders,Invalid PK,1,"));

    let fks = env.lines("logs/invalid_fks.csv")?;
    assert!(fks.iter().any(|l| l.starts_with("orders,Invalid FK,1,customer_id=c404 not found")));
    assert!(fks.iter().any(|l| l.starts_with("order_payments,Invalid FK,1,order_id=o4 not found")));

    let quality = env.lines("logs/data_quality_issues.csv")?;
    assert!(quality.iter().any(|l| l.contains("Null value in column 'customer_city'")));

    let counts = env.lines("logs/log_file.csv")?;
    assert_eq!(counts[0], "Table Name,Expected Records,Actual Records,Timestamp");
    assert!(counts.iter().any(|l| l.starts_with("orders,4,2,")));
    assert!(exists(&env.root, "target/run_results.json"));

    // second run appends audit rows but inserts nothing
    env.intake().arg("run").assert().success();
    assert_eq!(env.count("orders")?, 2);
    assert_eq!(env.count("order_payments")?, 2);
    assert_eq!(env.lines("logs/invalid_pks.csv")?.len(), 3);

    let results = fs::read_to_string(env.root.join("target/run_results.json"))?;
    let results: serde_json::Value = serde_json::from_str(&results)?;
    assert_eq!(results["rows_inserted"], 0);
    Ok(())
}

#[test]
fn test_dry_run_writes_nothing_to_the_warehouse() -> Result<()> {
    let env = IntakeTestEnv::new()?;

    env.intake()
        .arg("init")
        .env("RUST_LOG", "info")
        .assert()
        .success()
        .stderr(predicate::str::contains("Opening warehouse"));
    env.intake()
        .args(["run", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    assert_eq!(env.count("orders")?, 0);
    assert!(!exists(&env.root, "logs/log_file.csv"));
    assert!(exists(&env.root, "logs/invalid_pks.csv"));
    Ok(())
}

#[test]
fn test_inspect_and_clean() -> Result<()> {
    let env = IntakeTestEnv::new()?;

    env.intake().arg("init").assert().success();
    env.intake().arg("run").assert().success();

    env.intake()
        .args(["inspect", "--table", "customers", "--limit", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("customer_id, customer_city"))
        .stdout(predicate::str::contains("(3 rows)"));

    env.intake()
        .args(["inspect", "--table", "ghost"])
        .assert()
        .failure();

    env.intake().arg("clean").assert().success();
    assert!(!exists(&env.root, "logs"));
    assert!(!exists(&env.root, "target"));
    // the warehouse is not a clean target
    assert!(exists(&env.root, "warehouse.duckdb"));
    Ok(())
}

#[test]
fn test_missing_config_fails() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    intake_bin()
        .args(["run", "--project-dir"])
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration rejected"));
    Ok(())
}
