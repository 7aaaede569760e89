//! Line grammars of the four payroll report families.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Company tax id anywhere on a page (NN.NNN.NNN/NNNN-NN)
    pub static ref TAX_ID_GENERIC: Regex = Regex::new(
        r"\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}"
    ).unwrap();

    // Full payroll page header
    pub static ref COMPANY_NAME: Regex = Regex::new(
        r"(?i)(?:Apelido:.*?|\s*)Razão Social:\s*(.*?)(?:\s+CNPJ/CEI:|\s+Pág:|\n|$)"
    ).unwrap();

    pub static ref COMPANY_TAX_ID: Regex = Regex::new(
        r"(?i)CNPJ/CEI:\s*([\d\./\-]+)"
    ).unwrap();

    // Full payroll employee block
    pub static ref PAYROLL_OPEN: Regex = Regex::new(
        r"Cód:\s*(\d+).*?Nome:\s*(.*?)\s+Função:(.*?)(?:Dep|$)"
    ).unwrap();

    pub static ref PAYROLL_CONTRACT: Regex = Regex::new(
        r"Admissão:\s*(\d{2}/\d{2}/\d{4}).*?Salário:\s*([,.\d]+)"
    ).unwrap();

    pub static ref PAYROLL_TOTALS: Regex = Regex::new(
        r"Proventos:\s*([\d\.,]+).*?Descontos:\s*([\d\.,]+).*?Liquido:\s*([\d\.,]+)"
    ).unwrap();

    // Full payroll item lines; the event code is glued to the label
    pub static ref ITEM_SALARY: Regex = Regex::new(
        r"\d+Salário\s+[\d\.,]+\s+([\d\.,]+)"
    ).unwrap();

    pub static ref ITEM_DSR_OVERTIME: Regex = Regex::new(
        r"\d+D\.S\.R\. Sobre Horas Extras\s+([\d\.,]+)"
    ).unwrap();

    pub static ref ITEM_OVERTIME_50: Regex = Regex::new(
        r"\d+Horas Extras 50%\s+[\d\.,]+\s+([\d\.,]+)"
    ).unwrap();

    pub static ref ITEM_OVERTIME_100: Regex = Regex::new(
        r"\d+Horas? Extras 100%\s+[\d\.,]+\s+([\d\.,]+)"
    ).unwrap();

    pub static ref ITEM_TRANSPORT_REFUND: Regex = Regex::new(
        r"\d+Reembolso Vale Transporte\s+([\d\.,]+)"
    ).unwrap();

    pub static ref ITEM_INSS: Regex = Regex::new(
        r"\d+INSS Sobre Salário\s+[\d\.,]+\s+([\d\.,]+)"
    ).unwrap();

    pub static ref ITEM_IRRF: Regex = Regex::new(
        r"\d+IRRF Sobre Salário\s+[\d\.,]+\s+([\d\.,]+)"
    ).unwrap();

    pub static ref ITEM_TRANSPORT_DISCOUNT: Regex = Regex::new(
        r"\d+Desc\. Vale Transporte\s+[\d\.,]+\s+([\d\.,]+)"
    ).unwrap();

    pub static ref ITEM_ASSISTENTIAL: Regex = Regex::new(
        r"\d+Contribuição Assistencial\s+(?:[\d\.,]+\s+)?([\d\.,]+)"
    ).unwrap();

    // Full payroll base lines
    pub static ref BASE_INSS_COMPANY: Regex = Regex::new(
        r"Base INSS Empresa:\s*([\d\.,]+)"
    ).unwrap();

    pub static ref BASE_INSS_EMPLOYEE: Regex = Regex::new(
        r"Base INSS Funcionário:\s*([\d\.,]+)"
    ).unwrap();

    pub static ref BASE_FGTS: Regex = Regex::new(
        r"Base F\.G\.T\.S\.:\s*([\d\.,]+)"
    ).unwrap();

    // Applied after BASE_FGTS matches are cut from the line
    pub static ref FGTS: Regex = Regex::new(
        r"F\.G\.T\.S\.:\s*([\d\.,]+)"
    ).unwrap();

    // Assistential report
    pub static ref ASSISTENTIAL_NAME: Regex = Regex::new(
        r"Código:\s*(\d+)\s+Nome\s*:\s*(.+?)\s+Função\s*:\s*(.*)"
    ).unwrap();

    pub static ref ASSISTENTIAL_VALUES: Regex = Regex::new(
        r"Admissão\s*:\s*(\d{2}/\d{2}/\d{4})\s*Salário\s*:\s*([,.\d]+)\s*Valor\s*:\s*([,.\d]+)"
    ).unwrap();

    // Net pay report
    pub static ref NET_PAY_LINE: Regex = Regex::new(
        r"^\s*(\d+)\s+(.+?)\s+(\d{3}\.\d{3}\.\d{3}-\d{2})\s+(\d{2}/\d{2}/\d{4})\s+([\d\.,]+)"
    ).unwrap();

    // Extra hours report: code, name, reference, value
    pub static ref EXTRAS_LINE: Regex = Regex::new(
        r"^\s*(\d+)\s+(.+?)\s+([\d\.,]+)\s+([\d\.,]+)\s*$"
    ).unwrap();

    // Layout variant without the reference column
    pub static ref EXTRAS_LINE_SHORT: Regex = Regex::new(
        r"^\s*(\d+)\s+(.+?)\s+([\d\.,]+)\s*$"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fgts_skips_base_figure() {
        let line = "Base F.G.T.S.: 1.000,00 F.G.T.S.: 80,00";
        assert_eq!(&BASE_FGTS.captures(line).unwrap()[1], "1.000,00");
        let rest = BASE_FGTS.replace_all(line, "");
        assert_eq!(&FGTS.captures(&rest).unwrap()[1], "80,00");
        assert!(FGTS.captures(&BASE_FGTS.replace_all("Base F.G.T.S.: 1.000,00", "")).is_none());
        assert_eq!(&FGTS.captures("Valor de F.G.T.S.: 12,34").unwrap()[1], "12,34");
    }

    #[test]
    fn test_payroll_open() {
        let caps = PAYROLL_OPEN
            .captures("Cód: 10 Nome: Ana Silva Função: Analista")
            .unwrap();
        assert_eq!(&caps[1], "10");
        assert_eq!(&caps[2], "Ana Silva");
        assert_eq!(caps[3].trim(), "Analista");
    }

    #[test]
    fn test_payroll_open_stops_at_dependents() {
        let caps = PAYROLL_OPEN
            .captures("Cód: 7 Nome: João Souza Função: Motorista Dep IR: 1")
            .unwrap();
        assert_eq!(caps[3].trim(), "Motorista");
    }

    #[test]
    fn test_company_header() {
        let text = "Apelido: ACME Razão Social: ACME Serviços LTDA CNPJ/CEI:12.345.678/0001-90 Pág: 1";
        assert_eq!(&COMPANY_NAME.captures(text).unwrap()[1], "ACME Serviços LTDA");
        assert_eq!(&COMPANY_TAX_ID.captures(text).unwrap()[1], "12.345.678/0001-90");
    }

    #[test]
    fn test_extras_variants() {
        let caps = EXTRAS_LINE.captures("  0012 Ana Silva 10,00 150,00").unwrap();
        assert_eq!(&caps[2], "Ana Silva");
        assert_eq!(&caps[4], "150,00");

        assert!(EXTRAS_LINE.captures("12 Ana Silva 150,00").is_none());
        let caps = EXTRAS_LINE_SHORT.captures("12 Ana Silva 150,00").unwrap();
        assert_eq!(&caps[3], "150,00");
    }

    #[test]
    fn test_assistential_contribution_amount() {
        let caps = ITEM_ASSISTENTIAL
            .captures("512Contribuição Assistencial 1,00 25,00")
            .unwrap();
        assert_eq!(&caps[1], "25,00");
    }
}
