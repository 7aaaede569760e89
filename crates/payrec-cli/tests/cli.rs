//! End-to-end tests of the payrec binary over plain-text reports.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PAYROLL: &str = "\
Razão Social: ACME Serviços LTDA CNPJ/CEI:12.345.678/0001-90 Pág: 1
Cód: 0010 Nome: Ana Silva Função: Analista
Admissão: 01/02/2020 Cargo: 1 Salário: 2.000,00
1Salário 30,00 2.000,00
Proventos: 2.000,00 Descontos: 200,00 Liquido: 1.800,00
Cód: 0011 Nome: Bruno Costa Função: Auxiliar
Proventos: 1.500,00 Descontos: 150,00 Liquido: 1.350,00
";

const ASSISTENTIAL: &str = "\
Relação de Contribuição Assistencial 12.345.678/0001-90
Código: 10 Nome : Ana Silva Função : Analista
Admissão : 01/02/2020 Salário : 2.000,00 Valor : 20,00
";

const NET_PAY: &str = "\
Líquido de Folha 12.345.678/0001-90
10 Ana Silva 123.456.789-00 05/03/2024 1.800,00
11 Bruno Costa 987.654.321-00 05/03/2024 1.350,00
";

const EXTRAS: &str = "\
Relatório Horas Extras 50% 12.345.678/0001-90
0010 Ana Silva 10,00 150,00
";

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

/// Binary with an isolated config and rule table.
fn payrec(dir: &TempDir) -> Command {
    let config = dir.path().join("config.json");
    if !config.exists() {
        let rules = dir.path().join("rules.csv");
        fs::write(
            &config,
            format!(r#"{{"rules": {{"path": {:?}}}}}"#, rules.to_string_lossy()),
        )
        .unwrap();
    }
    let mut cmd = Command::cargo_bin("payrec").unwrap();
    cmd.arg("--config").arg(&config);
    cmd
}

#[test]
fn test_extract_net_pay_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "liquido.txt", NET_PAY);

    payrec(&dir)
        .args(["extract", "--family", "net-pay", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("CNPJ,Código,Funcionário"))
        .stdout(predicate::str::contains("Bruno Costa"))
        .stderr(predicate::str::contains("2 rows"));
}

#[test]
fn test_extract_reports_unclassified_extras() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "premios.txt", "Prêmios 12.345.678/0001-90\n7 Carla 300,00\n");

    payrec(&dir)
        .args(["extract", "--family", "extras", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("Não Classificado"))
        .stderr(predicate::str::contains("no event rule matched premios.txt"));
}

#[test]
fn test_extract_all_documents_failed() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "empty.txt", "   \n");

    payrec(&dir)
        .args(["extract", "--family", "payroll", &input])
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty.txt"));
}

#[test]
fn test_consolidate_writes_all_tables() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let payroll = write(dir.path(), "folha.txt", PAYROLL);
    let assistential = write(dir.path(), "assistencial.txt", ASSISTENTIAL);
    let net_pay = write(dir.path(), "liquido.txt", NET_PAY);
    let extras = write(dir.path(), "he50.txt", EXTRAS);

    payrec(&dir)
        .args(["consolidate", "--payroll", &payroll])
        .args(["--assistential", &assistential])
        .args(["--net-pay", &net_pay])
        .args(["--extras", &extras])
        .args(["--all-columns", "--output-dir"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Consolidated 2 employee rows"));

    for name in ["payroll", "assistential", "net_pay", "extras", "consolidated"] {
        assert!(out.join(format!("{}.csv", name)).exists(), "{} missing", name);
    }

    let consolidated = fs::read_to_string(out.join("consolidated.csv")).unwrap();
    let mut lines = consolidated.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("Código,CNPJ,Período,Empresa"));
    assert!(header.contains("Valor Assistencial_assistential"));
    assert!(header.contains("Horas Extras 50%_extras"));

    let ana = lines.next().unwrap();
    assert!(ana.starts_with("10,12345678000190,,ACME Serviços LTDA"));
    assert!(ana.contains("20.00"));
    assert!(ana.contains("150.00"));

    let bruno = lines.next().unwrap();
    assert!(bruno.starts_with("11,12345678000190,"));
    assert!(bruno.contains(",-,"));
}

#[test]
fn test_consolidate_default_columns_and_json() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let payroll = write(dir.path(), "folha.txt", PAYROLL);
    let net_pay = write(dir.path(), "liquido.txt", NET_PAY);

    payrec(&dir)
        .args(["consolidate", "--payroll", &payroll, "--net-pay", &net_pay])
        .args(["--format", "json", "--output-dir"])
        .arg(&out)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("consolidated.json")).unwrap()).unwrap();
    let first = &json[0];
    assert_eq!(first["Código"], "10");
    assert_eq!(first["Valor Líquido_net_pay"], 1800.0);
    assert!(first.get("Arquivo").is_none());
}

#[test]
fn test_consolidate_unknown_column_fails() {
    let dir = TempDir::new().unwrap();
    let payroll = write(dir.path(), "folha.txt", PAYROLL);

    payrec(&dir)
        .args(["consolidate", "--payroll", &payroll, "--columns", "Código,Nope"])
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown column: Nope"));
}

#[test]
fn test_consolidate_empty_column_list_fails() {
    let dir = TempDir::new().unwrap();
    let payroll = write(dir.path(), "folha.txt", PAYROLL);

    payrec(&dir)
        .args(["consolidate", "--payroll", &payroll, "--columns", ","])
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Select at least one column"));
}

#[test]
fn test_monthly_advance_deduction_joins_assistential() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let monthly = PAYROLL.replace(
        "1Salário 30,00 2.000,00\n",
        "1Salário 30,00 2.000,00\n520Desconto Adiantamento 40,00 800,00\n",
    );
    let payroll = write(dir.path(), "folha.txt", &monthly);
    let assistential = write(dir.path(), "assistencial.txt", ASSISTENTIAL);

    payrec(&dir)
        .args(["consolidate", "--payroll", &payroll, "--assistential", &assistential])
        .args(["--columns", "Código,Período,Valor Assistencial_assistential", "--output-dir"])
        .arg(&out)
        .assert()
        .success();

    let consolidated = fs::read_to_string(out.join("consolidated.csv")).unwrap();
    let ana = consolidated.lines().nth(1).unwrap();
    assert_eq!(ana, "10,,20.00");
}

#[test]
fn test_consolidate_refuses_empty_payroll() {
    let dir = TempDir::new().unwrap();
    let payroll = write(dir.path(), "folha.txt", "Razão Social: ACME\nnada aqui\n");

    payrec(&dir)
        .args(["consolidate", "--payroll", &payroll, "--output-dir"])
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("payroll table is empty"));
}

#[test]
fn test_rules_edit_cycle() {
    let dir = TempDir::new().unwrap();

    payrec(&dir)
        .args(["rules", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Adiantamento"));

    payrec(&dir)
        .args(["rules", "add", "Prêmios", "Prêmio", "--at", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. [extras] \"Prêmios\" -> Prêmio"));

    let input = write(dir.path(), "premios.txt", "Prêmios\n7 Carla 300,00\n");
    payrec(&dir)
        .args(["rules", "test", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("extras = Prêmio"));

    payrec(&dir)
        .args(["rules", "remove", "1"])
        .assert()
        .success();
    payrec(&dir)
        .args(["rules", "remove", "99"])
        .assert()
        .failure();
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();

    payrec(&dir)
        .args(["config", "set", "consolidation.join_mode", "outer"])
        .assert()
        .success();

    payrec(&dir)
        .args(["config", "get", "consolidation.join_mode"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"outer\""));

    payrec(&dir)
        .args(["config", "set", "consolidation.join_mode", "sideways"])
        .assert()
        .failure();
}
