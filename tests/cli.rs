use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn gastos(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gastos").unwrap();
    cmd.env("GASTOS_DATA_DIR", dir.path()).env_remove("GASTOS_LOG");
    cmd
}

fn init(dir: &TempDir) {
    gastos(dir).arg("init").assert().success();
}

#[test]
fn init_creates_default_categories() {
    let dir = TempDir::new().unwrap();

    gastos(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    gastos(&dir)
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Supermercados"))
        .stdout(predicate::str::contains("combustivel"));
}

#[test]
fn expense_add_expands_installments() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    gastos(&dir)
        .args([
            "expense", "add", "Phone", "--category", "lazer", "--total", "1200,00",
            "--installment-value", "100,00", "--installments", "3", "--date", "2024-01-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1/3  2024-01-01"))
        .stdout(predicate::str::contains("2/3  2024-01-31"))
        .stdout(predicate::str::contains("3/3  2024-03-01"));

    gastos(&dir)
        .args(["expense", "list", "--search", "phone"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page 1 of 1 (3 items)"));
}

#[test]
fn expense_add_rejects_zero_installments() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    gastos(&dir)
        .args([
            "expense", "add", "Nada", "--category", "lazer", "--total", "10", "--installments",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Installment count must be at least 1"));
}

#[test]
fn monthly_report_filters_by_value_and_range() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    for (value, date) in [("50,00", "2024-01-10"), ("75,00", "2024-02-10")] {
        gastos(&dir)
            .args([
                "expense", "add", "Market", "--category", "supermercados", "--total", value,
                "--date", date,
            ])
            .assert()
            .success();
    }

    gastos(&dir)
        .args([
            "report", "monthly", "--category", "supermercados", "--value", "50", "--from",
            "2024-01-01", "--to", "2024-01-31",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("TOTAL (1 expenses)"))
        .stdout(predicate::str::contains("R$ 50,00"))
        .stdout(predicate::str::contains("75,00").not());
}

#[test]
fn monthly_report_exports_csv() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    gastos(&dir)
        .args([
            "expense", "add", "Aluguel", "--category", "moradia", "--total", "1500", "--date",
            "2024-03-05",
        ])
        .assert()
        .success();

    let output = dir.path().join("report.csv");
    gastos(&dir)
        .args(["report", "monthly", "--category", "moradia", "--output"])
        .arg(&output)
        .assert()
        .success();

    let csv = std::fs::read_to_string(&output).unwrap();
    assert!(csv.starts_with("id,name,due_date,value,installment,category"));
    assert!(csv.contains("Aluguel"));
    assert!(csv.contains("\"1500,00\""));
}

#[test]
fn monthly_report_unknown_category_fails() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    gastos(&dir)
        .args(["report", "monthly", "--category", "nao-existe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid filter"));
}

#[test]
fn expense_suggest_prints_json() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    for name in ["Padaria", "Mercado Central"] {
        gastos(&dir)
            .args(["expense", "add", name, "--category", "supermercados", "--total", "10"])
            .assert()
            .success();
    }

    gastos(&dir)
        .args(["expense", "suggest", "pada"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"[{"name":"Padaria"}]"#));
}

#[test]
fn work_session_uses_registered_rate() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    gastos(&dir).args(["rate", "add", "60,00"]).assert().success();

    gastos(&dir)
        .args([
            "work", "add", "Suporte", "--start", "09:00", "--end", "10:30", "--date", "2024-03-04",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1h30"))
        .stdout(predicate::str::contains("R$ 90,00"));
}

#[test]
fn parts_purchase_blocks_city_delete() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    gastos(&dir).args(["vendor", "add", "Auto Peças Silva"]).assert().success();
    gastos(&dir).args(["city", "add", "Curitiba"]).assert().success();

    gastos(&dir)
        .args([
            "parts", "add", "Fiat Uno", "--vendor", "auto peças silva", "--city", "curitiba",
            "--total", "215,00", "--km", "85000", "--next-km", "95000",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered parts purchase"));

    gastos(&dir)
        .args(["parts", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fiat Uno"))
        .stdout(predicate::str::contains("Curitiba"));

    gastos(&dir)
        .args(["city", "delete", "curitiba"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("parts purchases reference it"));
}

#[test]
fn audit_lists_changes() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    gastos(&dir).args(["category", "create", "Pets"]).assert().success();

    gastos(&dir)
        .args(["audit", "--limit", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pets"));
}
