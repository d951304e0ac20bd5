use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// One billed procedure line inside a hospital admission record (AIH).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureBillingEntry {
    /// SIGTAP-style dotted/dashed code, e.g. "04.09.06.013-5".
    pub procedure_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub gross_value: BigDecimal,
    /// CBO code of the professional who performed the procedure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_role_code: Option<String>,
    /// Billing sequence within the admission; missing sequences sort last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admission_id: Option<String>,
}

impl ProcedureBillingEntry {
    pub fn normalized_code(&self) -> String {
        normalize_procedure_code(&self.procedure_code)
    }
}

/// Strips dots and dashes from a procedure code so every lookup uses the
/// same key ("04.09.06.013-5" -> "0409060135"). An empty result means the
/// source cell held no code at all.
pub fn normalize_procedure_code(code: &str) -> String {
    code.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Uppercases, trims, collapses inner whitespace and strips Latin
/// diacritics so rule lookup survives the free-text physician names coming
/// from billing records ("  Dr. João  Silva " -> "DR. JOAO SILVA").
pub fn normalize_physician_name(name: &str) -> String {
    let upper: String = name
        .trim()
        .chars()
        .flat_map(char::to_uppercase)
        .map(strip_diacritic)
        .collect();
    upper.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_diacritic(c: char) -> char {
    match c {
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ç' => 'C',
        'Ñ' => 'N',
        _ => c,
    }
}
