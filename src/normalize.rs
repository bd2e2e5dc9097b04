//! Item description normalization
//!
//! Government purchase descriptions carry administrative prefixes, project
//! context and packaging noise. [`DescriptionNormalizer`] reduces them to a
//! short category key so the same product groups into one item node.

use regex::Regex;

/// Key returned when nothing identifying survives normalization
pub const UNKNOWN_ITEM: &str = "desconocido";

/// Maps a raw description to a normalized item key
pub trait Normalize: Send + Sync {
    fn normalize(&self, text: &str) -> String;
}

impl<F> Normalize for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn normalize(&self, text: &str) -> String {
        self(text)
    }
}

/// Lowercase and strip diacritics (`"Educación"` -> `"educacion"`)
pub fn fold(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Everything after one of these is project context, not product
const CUT_WORDS: [&str; 18] = [
    " para ",
    " en el ",
    " en la ",
    " del ",
    " de la ",
    " con la ",
    " segun ",
    " correspondiente ",
    " solicitado ",
    " meta ",
    " componente ",
    " obra:",
    " proyecto:",
    " actividad:",
    " - ",
    " incluye ",
    " con ",
    ":",
];

/// Synonym table, first whole-word match wins
const SYNONYMS: [(&str, &str); 22] = [
    ("petroleo", "diesel"),
    ("diesel", "diesel"),
    ("gasohol", "gasolina"),
    ("gasolina", "gasolina"),
    ("papel bond", "papel bond"),
    ("hojas bond", "papel bond"),
    ("tinta", "tinta de impresion"),
    ("toner", "toner"),
    ("cemento", "cemento"),
    ("ladrillo", "ladrillo"),
    ("agua de mesa", "agua de mesa"),
    ("agua mineral", "agua de mesa"),
    ("agua para consumo", "agua de mesa"),
    ("bebidas", "agua y bebidas"),
    ("gaseosa", "agua y bebidas"),
    ("lapicero", "boligrafo"),
    ("boligrafo", "boligrafo"),
    ("bloqueador", "protector solar"),
    ("soat", "seguro vehicular soat"),
    ("triplay", "triplay"),
    ("computadora", "computadora"),
    ("laptop", "computadora"),
];

/// Default [`Normalize`] implementation for Spanish procurement descriptions
#[derive(Debug, Clone)]
pub struct DescriptionNormalizer {
    prefix: Regex,
    service: Regex,
    quantity: Regex,
    units: Regex,
    paper_size: Regex,
    punctuation: Regex,
    spaces: Regex,
    synonyms: Vec<(Regex, &'static str)>,
}

impl DescriptionNormalizer {
    pub fn new() -> Result<Self, regex::Error> {
        let synonyms = SYNONYMS
            .iter()
            .map(|&(key, value)| Ok((Regex::new(&format!(r"\b{}\b", regex::escape(key)))?, value)))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self {
            prefix: Regex::new(r"^(adqui\w+|adq\.|adq|contrat\w+|compra|suministro)\s*(de)?\s*")?,
            service: Regex::new(r"^(servicio)\s*(de)?\s*")?,
            quantity: Regex::new(r"\bx\s*\d+.*")?,
            units: Regex::new(r"\b\d+(\.\d+)?\s*(gr|g|kg|ml|l|gal|hp|mm|cm|in|watts|w)\b")?,
            paper_size: Regex::new(r"\btamano\s*a\d")?,
            punctuation: Regex::new(r"[^\w\s]")?,
            spaces: Regex::new(r"\s+")?,
            synonyms,
        })
    }

    fn category(text: &str) -> Option<&'static str> {
        let has = |w: &str| text.contains(w);

        if has("utiles") && (has("escritorio") || has("oficina")) {
            Some("utiles de escritorio")
        } else if has("limpieza") && (has("material") || has("insumo") || has("utiles") || has("aseo")) {
            Some("materiales de limpieza")
        } else if has("proteccion") && (has("personal") || has("epp") || has("seguridad")) {
            Some("equipos de proteccion personal epp")
        } else if ["vestuario", "indumentaria", "uniforme", "camisa", "polo"].iter().any(|w| has(w)) {
            Some("vestuario institucional")
        } else if has("alquiler") && (has("camioneta") || has("vehiculo") || has("minivan")) {
            Some("alquiler de camioneta")
        } else if has("energia electrica") || has("suministro de energia") {
            Some("servicio de energia electrica")
        } else if has("seguridad") && (has("temporal") || has("vigilancia")) {
            Some("servicio de seguridad y vigilancia")
        } else if has("consultoria") {
            Some("servicio de consultoria")
        } else {
            None
        }
    }
}

impl Normalize for DescriptionNormalizer {
    fn normalize(&self, text: &str) -> String {
        let mut text = fold(text.trim());

        text = self.prefix.replace(&text, "").into_owned();
        if text.starts_with("servicio") {
            text = self.service.replace(&text, "servicio ").into_owned();
        }

        for cut in CUT_WORDS {
            if let Some(pos) = text.find(cut) {
                text.truncate(pos);
            }
        }

        text = self.quantity.replace_all(&text, "").into_owned();
        text = self.units.replace_all(&text, "").into_owned();
        text = self.paper_size.replace_all(&text, "").into_owned();
        text = self.punctuation.replace_all(&text, "").into_owned();

        if let Some(category) = Self::category(&text) {
            return category.to_string();
        }

        if !text.contains("camioneta") && !text.contains("alquiler") {
            if let Some((_, standard)) = self.synonyms.iter().find(|(re, _)| re.is_match(&text)) {
                return standard.to_string();
            }
        }

        let text = self.spaces.replace_all(&text, " ").trim().to_string();
        if text.is_empty() {
            UNKNOWN_ITEM.to_string()
        } else {
            text
        }
    }
}
