use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pocket(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pocket").unwrap();
    cmd.env("HOME", home.path())
        .env("POCKET_LEDGER_DATA_DIR", home.path().join("data"))
        .env_remove("RUST_LOG");
    cmd
}

fn add(home: &TempDir, tx_type: &str, amount: &str, category: &str, date: &str, note: &str) {
    pocket(home)
        .args([
            "add", "--type", tx_type, "--amount", amount, "--category", category, "--date", date,
            "--note", note,
        ])
        .assert()
        .success();
}

#[test]
fn init_creates_database() {
    let home = TempDir::new().unwrap();
    pocket(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized pocket ledger"));
    assert!(home.path().join("data").join("ledger.db").exists());
}

#[test]
fn add_then_list_all() {
    let home = TempDir::new().unwrap();
    add(&home, "expense", "12,50", "Ocio", "2024-03-05", "cine");
    add(&home, "income", "1800", "Nómina", "2024-03-01", "NOMINA MARZO");

    pocket(&home)
        .args(["list", "--range", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("05/03/2024"))
        .stdout(predicate::str::contains("cine"))
        .stdout(predicate::str::contains("1.800,00 €"))
        .stdout(predicate::str::contains("Transactions (2)"));

    pocket(&home)
        .args(["list", "--range", "all", "--type", "expense"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions (1)"))
        .stdout(predicate::str::contains("NOMINA").not());
}

#[test]
fn add_rejects_non_positive_amount() {
    let home = TempDir::new().unwrap();
    pocket(&home)
        .args(["add", "--type", "expense", "--amount", "0", "--category", "Ocio"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("amount must be greater than 0"));
}

#[test]
fn add_rejects_unknown_type() {
    let home = TempDir::new().unwrap();
    pocket(&home)
        .args(["add", "--type", "gift", "--amount", "5", "--category", "Ocio"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn delete_unknown_id_fails() {
    let home = TempDir::new().unwrap();
    pocket(&home)
        .args(["delete", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown transaction: nope"));
}

#[test]
fn import_bank_statement_and_summarize() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("extracto.csv");
    std::fs::write(
        &file,
        "Concepto;Fecha;Importe\n\
         NOMINA EMPRESA;01/03/2024;1.800,00\n\
         MERCADONA;02/03/2024;-45,30\n\
         RENFE BILLETE;03/03/2024;-12,00\n\
         SIN IMPORTE;04/03/2024;\n",
    )
    .unwrap();

    pocket(&home)
        .args(["import", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 transactions imported"))
        .stdout(predicate::str::contains("bank statement"));

    pocket(&home)
        .args(["summary", "--range", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.800,00 €"))
        .stdout(predicate::str::contains("57,30 €"))
        .stdout(predicate::str::contains("Supermercado"))
        .stdout(predicate::str::contains("Transporte"))
        .stdout(predicate::str::contains("2024-03"));
}

#[test]
fn import_tolerates_non_utf8_concepts() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("extracto-latin1.csv");
    let mut bytes = b"Concepto;Fecha;Importe\nCOMPRA CAFETER".to_vec();
    bytes.push(0xCD);
    bytes.extend_from_slice(b"A;05/03/2024;-4,50\nMERCADONA;06/03/2024;-10,00\n");
    std::fs::write(&file, bytes).unwrap();

    pocket(&home)
        .args(["import", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 transactions imported"));

    pocket(&home)
        .args(["list", "--range", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("COMPRA CAFETER"))
        .stdout(predicate::str::contains("4,50"));
}

#[test]
fn import_header_only_fails_and_keeps_store() {
    let home = TempDir::new().unwrap();
    add(&home, "income", "10", "Otros", "2024-03-01", "");
    let file = home.path().join("empty.csv");
    std::fs::write(&file, "id,type,amount,category,date,note\n").unwrap();

    pocket(&home)
        .args(["import", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));

    pocket(&home)
        .args(["list", "--range", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions (1)"));
}

#[test]
fn export_writes_self_format() {
    let home = TempDir::new().unwrap();
    add(&home, "expense", "9.99", "Suscripciones", "2024-03-10", "Netflix, mensual");
    let out = home.path().join("out.csv");

    pocket(&home)
        .args(["export", "--output", out.to_str().unwrap()])
        .assert()
        .success();

    let text = std::fs::read_to_string(&out).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("id,type,amount,category,date,note"));
    let row = lines.next().unwrap();
    assert!(row.ends_with(",expense,9.99,Suscripciones,2024-03-10,\"Netflix, mensual\""));
}

#[test]
fn export_empty_store_fails() {
    let home = TempDir::new().unwrap();
    pocket(&home)
        .arg("export")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No transactions to export"));
}

#[test]
fn categories_add_and_list() {
    let home = TempDir::new().unwrap();
    pocket(&home)
        .args(["categories", "add", "Mascotas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added category: Mascotas"));
    pocket(&home)
        .args(["categories", "add", "Mascotas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    pocket(&home)
        .args(["categories", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mascotas"))
        .stdout(predicate::str::contains("#22c55e"));
}

#[test]
fn clear_requires_confirmation() {
    let home = TempDir::new().unwrap();
    add(&home, "income", "10", "Otros", "2024-03-01", "");
    pocket(&home)
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes"));
    pocket(&home)
        .args(["clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 transactions"));
    pocket(&home)
        .args(["list", "--range", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions match"));
}

#[test]
fn status_reports_counts() {
    let home = TempDir::new().unwrap();
    add(&home, "income", "10", "Regalos", "2024-03-01", "");
    pocket(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions:  1"))
        .stdout(predicate::str::contains("Custom:        1"));
}
