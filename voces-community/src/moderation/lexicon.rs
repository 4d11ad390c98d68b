//! Static Spanish word lists backing the moderation heuristics.
//!
//! Matching is done on lowercased, punctuation-trimmed tokens, except for
//! `PROFANITY`, which is matched as a raw substring of the whole text.

/// Vocabulary that signals a concrete, constructive proposal.
pub const CONSTRUCTIVE: &[&str] = &[
    "mejorar",
    "mejora",
    "mejoren",
    "proponer",
    "propongo",
    "propuesta",
    "sugerir",
    "sugiero",
    "sugerencia",
    "necesitamos",
    "necesitan",
    "necesita",
    "implementar",
    "organizar",
    "crear",
    "construir",
    "conseguir",
    "cambiar",
    "solución",
    "solucionar",
    "beneficio",
    "beneficiaría",
    "ayudar",
    "ayudaría",
    "podría",
    "podríamos",
    "deberíamos",
    "recomiendo",
    "idea",
    "proyecto",
    "plan",
    "campaña",
];

/// Vocabulary that signals complaint or hostility rather than a proposal.
pub const NEGATIVE: &[&str] = &[
    "odio",
    "horrible",
    "pésimo",
    "pésima",
    "terrible",
    "inútil",
    "basura",
    "asco",
    "feo",
    "fea",
    "malo",
    "mala",
    "peor",
    "nunca",
    "jamás",
    "aburrido",
    "aburrida",
    "fastidio",
    "detesto",
    "injusto",
    "injusta",
];

/// Filler vocabulary that carries no concrete content.
pub const VAGUE: &[&str] = &[
    "cosa",
    "cosas",
    "algo",
    "alguien",
    "eso",
    "esto",
    "aquello",
    "alguna",
    "alguno",
    "algún",
    "cualquier",
    "cualquiera",
    "tal",
    "etcétera",
];

/// School-domain vocabulary; a suggestion should touch at least one of these.
pub const SPECIFIC: &[&str] = &[
    "biblioteca",
    "libro",
    "libros",
    "matemáticas",
    "español",
    "ciencias",
    "inglés",
    "sociales",
    "profesor",
    "profesora",
    "profesores",
    "rector",
    "coordinador",
    "salón",
    "salones",
    "clase",
    "clases",
    "grado",
    "grupo",
    "cafetería",
    "restaurante",
    "baños",
    "patio",
    "recreo",
    "descanso",
    "tarea",
    "tareas",
    "examen",
    "exámenes",
    "laboratorio",
    "pupitres",
    "tablero",
    "uniforme",
    "horario",
    "deportes",
    "cancha",
    "estudiantes",
    "estudiante",
    "estudiar",
    "colegio",
    "escuela",
];

/// Slurs and profanity; presence anywhere in the text (substring,
/// case-insensitive) is an immediate rejection.
pub const PROFANITY: &[&str] = &[
    "mierda",
    "pendejo",
    "pendeja",
    "cabrón",
    "cabron",
    "puta",
    "puto",
    "marica",
    "maricón",
    "gonorrea",
    "hijueputa",
    "malparido",
    "malparida",
    "joder",
    "coño",
    "verga",
    "culero",
    "pinche",
    "imbécil",
    "imbecil",
    "idiota",
    "estúpido",
    "estupido",
];

/// Generic boilerplate phrases; text dominated by these says nothing.
pub const BOILERPLATE: &[&str] = &[
    "me gustaría",
    "sería bueno",
    "estaría bien",
    "quiero que",
    "por favor",
    "muchas gracias",
    "gracias por su atención",
    "es muy importante",
    "en mi opinión",
];
