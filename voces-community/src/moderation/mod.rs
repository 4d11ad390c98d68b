//! Content moderation for suggestion submissions.
//!
//! Two independent passes over the lowercased title+body:
//! a spam/abuse pass (profanity, character runs, symbol density, lexical
//! diversity, boilerplate dominance) and a lexicon-ratio pass (negative,
//! constructive, vague, and school-domain vocabulary shares plus a token
//! floor). Deterministic, no I/O; all thresholds come from
//! [`ModerationConfig`].

mod lexicon;

use crate::config::ModerationConfig;

/// Outcome of validating a candidate (title, body) pair. Rejection reasons
/// are user-facing Spanish strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected { reason: String },
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Accepted => None,
            Verdict::Rejected { reason } => Some(reason),
        }
    }
}

/// Validate a suggestion submission against the moderation policy.
pub fn validate(title: &str, body: &str, cfg: &ModerationConfig) -> Verdict {
    let text = format!("{} {}", title, body).to_lowercase();
    let tokens = tokenize(&text);

    if let Some(reason) = spam_check(&text, &tokens, cfg) {
        return Verdict::Rejected { reason };
    }

    if let Some(reason) = lexicon_check(&tokens, cfg) {
        return Verdict::Rejected { reason };
    }

    Verdict::Accepted
}

/// Lowercased tokens with surrounding punctuation stripped; empty tokens
/// (pure punctuation) are dropped.
fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|t| !t.is_empty())
        .collect()
}

fn ratio_in(tokens: &[&str], list: &[&str]) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let hits = tokens.iter().filter(|t| list.contains(*t)).count();
    hits as f64 / tokens.len() as f64
}

fn spam_check(text: &str, tokens: &[&str], cfg: &ModerationConfig) -> Option<String> {
    if lexicon::PROFANITY.iter().any(|w| text.contains(w)) {
        return Some("El texto contiene lenguaje inapropiado.".to_string());
    }

    if has_repeat_run(text, cfg.repeat_run) {
        return Some("El texto contiene repeticiones excesivas de caracteres.".to_string());
    }

    let visible: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    if !visible.is_empty() {
        let symbols = visible.iter().filter(|c| !c.is_alphabetic()).count();
        if symbols as f64 / visible.len() as f64 >= cfg.max_symbol_ratio {
            return Some("El texto contiene demasiados símbolos o caracteres no válidos.".to_string());
        }
    }

    if tokens.len() > cfg.diversity_check_tokens {
        let mut unique: Vec<&str> = tokens.to_vec();
        unique.sort_unstable();
        unique.dedup();
        let diversity = unique.len() as f64 / tokens.len() as f64;
        if diversity < cfg.min_lexical_diversity {
            return Some("El texto es repetitivo; parece spam.".to_string());
        }
    }

    let (hits, covered) = boilerplate_coverage(text);
    let share = if text.is_empty() { 0.0 } else { covered as f64 / text.chars().count() as f64 };
    if share >= cfg.max_boilerplate_share
        || (tokens.len() < cfg.boilerplate_short_tokens && hits > cfg.max_boilerplate_hits)
    {
        return Some("El texto está compuesto mayormente de frases genéricas.".to_string());
    }

    None
}

fn lexicon_check(tokens: &[&str], cfg: &ModerationConfig) -> Option<String> {
    let n = tokens.len();

    if ratio_in(tokens, lexicon::NEGATIVE) > cfg.max_negative_ratio {
        return Some(
            "El tono de la sugerencia es demasiado negativo; replantéala de forma constructiva."
                .to_string(),
        );
    }

    if n > cfg.constructive_check_tokens
        && ratio_in(tokens, lexicon::CONSTRUCTIVE) < cfg.min_constructive_ratio
    {
        return Some(
            "La sugerencia no propone nada concreto; incluye una propuesta de mejora.".to_string(),
        );
    }

    if ratio_in(tokens, lexicon::VAGUE) > cfg.max_vague_ratio {
        return Some(
            "La sugerencia es demasiado vaga; describe la situación con más detalle.".to_string(),
        );
    }

    if n > cfg.specific_check_tokens && ratio_in(tokens, lexicon::SPECIFIC) < cfg.min_specific_ratio {
        return Some(
            "La sugerencia no menciona ningún aspecto concreto del colegio.".to_string(),
        );
    }

    if n < cfg.min_tokens {
        return Some(format!(
            "La sugerencia es demasiado corta; escribe al menos {} palabras.",
            cfg.min_tokens
        ));
    }

    None
}

fn has_repeat_run(text: &str, run: usize) -> bool {
    let mut current = 0usize;
    let mut last: Option<char> = None;
    for c in text.chars() {
        if Some(c) == last {
            current += 1;
            if current >= run {
                return true;
            }
        } else {
            last = Some(c);
            current = 1;
        }
    }
    false
}

/// Total occurrences of boilerplate phrases and the characters they cover.
fn boilerplate_coverage(text: &str) -> (usize, usize) {
    let mut hits = 0;
    let mut covered = 0;
    for phrase in lexicon::BOILERPLATE {
        let count = text.matches(phrase).count();
        hits += count;
        covered += count * phrase.chars().count();
    }
    (hits, covered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ModerationConfig {
        ModerationConfig::default()
    }

    fn reject_reason(title: &str, body: &str) -> String {
        match validate(title, body, &cfg()) {
            Verdict::Rejected { reason } => reason,
            Verdict::Accepted => panic!("expected rejection for {title:?} / {body:?}"),
        }
    }

    #[test]
    fn accepts_a_concrete_constructive_suggestion() {
        let verdict = validate(
            "Mejorar la biblioteca",
            "Propongo organizar una campaña para conseguir más libros de matemáticas y \
             ciencias, porque los estudiantes del grado sexto necesitan material \
             actualizado para estudiar.",
            &cfg(),
        );
        assert!(verdict.is_accepted(), "got {verdict:?}");
    }

    #[test]
    fn rejects_below_the_token_floor_despite_constructive_vocabulary() {
        // 11 tokens total: trips the floor, not the constructive check.
        let reason = reject_reason(
            "Biblioteca",
            "Se necesitan más libros de matemáticas para el grado 6.",
        );
        assert!(reason.contains("demasiado corta"), "got: {reason}");
    }

    #[test]
    fn rejects_profanity_regardless_of_surrounding_content() {
        let reason = reject_reason(
            "Sugerencia",
            "Propongo mejorar la biblioteca pero el coordinador es un pendejo y \
             necesitamos más libros de ciencias para todos los grados.",
        );
        assert!(reason.contains("lenguaje inapropiado"), "got: {reason}");
    }

    #[test]
    fn profanity_matches_as_substring() {
        let reason = reject_reason("Queja", "ese señor es unPENDEJOtotal");
        assert!(reason.contains("lenguaje inapropiado"), "got: {reason}");
    }

    #[test]
    fn rejects_character_repetition_runs() {
        let reason = reject_reason("Holaaaaa", "quiero más recreo");
        assert!(reason.contains("repeticiones"), "got: {reason}");
    }

    #[test]
    fn rejects_symbol_heavy_text() {
        let reason = reject_reason("!!!", "???# $$$% &&&( )*+@ !!?!");
        assert!(reason.contains("símbolos"), "got: {reason}");
    }

    #[test]
    fn rejects_low_lexical_diversity_spam() {
        let body = "libros ".repeat(12);
        let reason = reject_reason("Spam", body.trim());
        assert!(reason.contains("repetitivo"), "got: {reason}");
    }

    #[test]
    fn rejects_boilerplate_dominated_short_text() {
        let reason = reject_reason(
            "Petición",
            "Me gustaría que por favor mejoren todo, me gustaría verlo pronto",
        );
        assert!(reason.contains("frases genéricas"), "got: {reason}");
    }

    #[test]
    fn rejects_negative_tone() {
        let reason = reject_reason(
            "Quejas",
            "Odio el colegio todo es horrible y pésimo nada funciona nunca me gusta \
             venir a clases porque todo es terrible",
        );
        assert!(reason.contains("negativo"), "got: {reason}");
    }

    #[test]
    fn rejects_text_without_constructive_vocabulary() {
        let reason = reject_reason(
            "Ventanas",
            "El salón de clases tiene muchas ventanas grandes y por ellas entra \
             bastante luz del sol durante la mañana",
        );
        assert!(reason.contains("no propone"), "got: {reason}");
    }

    #[test]
    fn rejects_vague_text() {
        let reason = reject_reason(
            "Idea",
            "Propongo mejorar algo de eso que hay en alguna cosa del colegio porque \
             sería bueno cambiar cosas y tal",
        );
        assert!(reason.contains("vaga"), "got: {reason}");
    }

    #[test]
    fn rejects_text_with_no_school_domain_vocabulary() {
        let reason = reject_reason(
            "Orden",
            "Propongo organizar mejor las actividades generales para que todo funcione \
             de una manera más ordenada y agradable cada día",
        );
        assert!(reason.contains("aspecto concreto"), "got: {reason}");
    }

    #[test]
    fn validation_is_deterministic() {
        let title = "Mejorar la cafetería";
        let body = "Sugiero implementar un plan para organizar mejor las filas del \
                    restaurante escolar porque los estudiantes pierden mucho tiempo de \
                    descanso esperando su almuerzo";
        let first = validate(title, body, &cfg());
        for _ in 0..3 {
            assert_eq!(validate(title, body, &cfg()), first);
        }
    }

    #[test]
    fn thresholds_come_from_configuration() {
        let mut relaxed = cfg();
        relaxed.min_tokens = 5;
        let verdict = validate(
            "Biblioteca",
            "Necesitamos más libros de matemáticas para el grado sexto",
            &relaxed,
        );
        assert!(verdict.is_accepted(), "got {verdict:?}");
    }

    #[test]
    fn tokenizer_strips_punctuation_and_drops_empty_tokens() {
        let tokens = tokenize("¡hola! -- (mundo) 6.");
        assert_eq!(tokens, vec!["hola", "mundo", "6"]);
    }
}
