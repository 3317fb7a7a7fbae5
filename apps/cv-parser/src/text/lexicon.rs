//! Static keyword tables shared by the classifier, the scorer and the dictionary
//! extractors. Every multi-word entry is stored in token form (lower case, single
//! spaces, no separator punctuation) so it can be matched against `token_string`.

use once_cell::sync::Lazy;

use crate::models::{EmploymentType, SkillLevel};
use crate::text::classifier::SectionKind;

/// Section headers matched against the lower-cased, trimmed line.
pub const SECTION_HEADERS: &[(&str, SectionKind)] = &[
    ("experience", SectionKind::Experience),
    ("experiences", SectionKind::Experience),
    ("professional experience", SectionKind::Experience),
    ("work experience", SectionKind::Experience),
    ("employment history", SectionKind::Experience),
    ("experiência", SectionKind::Experience),
    ("experiencia", SectionKind::Experience),
    ("experiências", SectionKind::Experience),
    ("experiência profissional", SectionKind::Experience),
    ("experiencia profissional", SectionKind::Experience),
    ("experiências profissionais", SectionKind::Experience),
    ("education", SectionKind::Education),
    ("academic background", SectionKind::Education),
    ("educação", SectionKind::Education),
    ("educacao", SectionKind::Education),
    ("formação", SectionKind::Education),
    ("formacao", SectionKind::Education),
    ("formação acadêmica", SectionKind::Education),
    ("formacao academica", SectionKind::Education),
    ("escolaridade", SectionKind::Education),
    ("skills", SectionKind::Skills),
    ("technical skills", SectionKind::Skills),
    ("top skills", SectionKind::Skills),
    ("habilidades", SectionKind::Skills),
    ("competências", SectionKind::Skills),
    ("competencias", SectionKind::Skills),
    ("principais competências", SectionKind::Skills),
    ("tecnologias", SectionKind::Skills),
    ("languages", SectionKind::Languages),
    ("idiomas", SectionKind::Languages),
    ("línguas", SectionKind::Languages),
    ("certifications", SectionKind::Certifications),
    ("certificações", SectionKind::Certifications),
    ("certificacoes", SectionKind::Certifications),
    ("certificados", SectionKind::Certifications),
    ("licenses & certifications", SectionKind::Certifications),
    ("courses", SectionKind::Courses),
    ("cursos", SectionKind::Courses),
    ("cursos complementares", SectionKind::Courses),
    ("projects", SectionKind::Projects),
    ("projetos", SectionKind::Projects),
    ("summary", SectionKind::Summary),
    ("professional summary", SectionKind::Summary),
    ("resumo", SectionKind::Summary),
    ("resumo profissional", SectionKind::Summary),
    ("profile", SectionKind::Summary),
    ("perfil", SectionKind::Summary),
    ("perfil profissional", SectionKind::Summary),
    ("about", SectionKind::Summary),
    ("about me", SectionKind::Summary),
    ("sobre", SectionKind::Summary),
    ("sobre mim", SectionKind::Summary),
    ("objective", SectionKind::Summary),
    ("objetivo", SectionKind::Summary),
    ("contact", SectionKind::Contact),
    ("contato", SectionKind::Contact),
    ("contatos", SectionKind::Contact),
    ("awards", SectionKind::Awards),
    ("honors-awards", SectionKind::Awards),
    ("prêmios", SectionKind::Awards),
    ("achievements", SectionKind::Awards),
    ("conquistas", SectionKind::Awards),
    ("interests", SectionKind::Other),
    ("interesses", SectionKind::Other),
    ("references", SectionKind::Other),
    ("referências", SectionKind::Other),
    ("publications", SectionKind::Other),
    ("publicações", SectionKind::Other),
    ("volunteering", SectionKind::Other),
    ("voluntariado", SectionKind::Other),
];

/// Header aliases that only show up in all-caps layouts.
pub const HEADER_ALIASES_UPPER: &[(&str, SectionKind)] = &[
    ("WORK HISTORY", SectionKind::Experience),
    ("CAREER HISTORY", SectionKind::Experience),
    ("PROFESSIONAL BACKGROUND", SectionKind::Experience),
    ("HISTÓRICO PROFISSIONAL", SectionKind::Experience),
    ("TRAJETÓRIA PROFISSIONAL", SectionKind::Experience),
    ("EDUCATIONAL BACKGROUND", SectionKind::Education),
    ("FORMAÇÃO ACADÊMICA", SectionKind::Education),
    ("FORMAÇÃO EDUCACIONAL", SectionKind::Education),
    ("TECH STACK", SectionKind::Skills),
    ("CORE COMPETENCIES", SectionKind::Skills),
    ("CONHECIMENTOS TÉCNICOS", SectionKind::Skills),
    ("CONTACT INFO", SectionKind::Contact),
    ("PERSONAL INFORMATION", SectionKind::Contact),
    ("DADOS PESSOAIS", SectionKind::Contact),
    ("INFORMAÇÕES PESSOAIS", SectionKind::Contact),
    ("QUALIFICAÇÕES", SectionKind::Summary),
    ("SÍNTESE PROFISSIONAL", SectionKind::Summary),
];

/// Brazilian state codes and names accepted after the comma of a `City, ST` line.
pub const STATE_TOKENS: &[&str] = &[
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA",
    "PB", "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
    "Santa Catarina", "São Paulo", "Rio de Janeiro", "Minas Gerais", "Paraná",
    "Rio Grande do Sul", "Bahia", "Pernambuco", "Ceará", "Goiás", "Distrito Federal",
    "Espírito Santo",
];

pub const COUNTRY_TOKENS: &[&str] = &[
    "Brasil", "Brazil", "BR", "United States", "USA", "US", "Canada", "Portugal",
    "Germany", "Spain", "UK", "United Kingdom", "Italy", "France", "Argentina", "Chile",
    "Uruguay", "Mexico", "Ireland", "Netherlands",
];

/// Unambiguous location words; a 2–5 word line containing one is a location.
pub const LOCATION_KEYWORDS: &[&str] = &[
    "brasil",
    "brazil",
    "remote",
    "remoto",
    "hybrid",
    "híbrido",
    "metropolitan",
    "metropolitana",
    "região",
    "portugal",
    "germany",
    "canada",
    "usa",
];

/// Mid-sentence connectors. Portuguese `de/da/do` are left out: institution and
/// company names are full of them.
pub const CONNECTOR_WORDS: &[&str] = &[
    "of", "for", "with", "by", "that", "to", "the", "which", "para", "com", "por", "que",
    "pela", "pelo", "onde", "através",
];

/// Verb tokens that mark an achievement sentence.
pub const ACHIEVEMENT_VERBS: &[&str] = &[
    "led",
    "delivered",
    "implemented",
    "modernized",
    "developed",
    "built",
    "designed",
    "created",
    "improved",
    "reduced",
    "increased",
    "migrated",
    "automated",
    "launched",
    "maintained",
    "responsible",
    "worked",
    "liderei",
    "desenvolvi",
    "implementei",
    "criei",
    "entreguei",
    "modernizei",
    "participei",
    "atuei",
    "trabalhei",
    "reduzi",
    "automatizei",
    "responsável",
    "responsavel",
];

/// Role/title keywords in English and Portuguese.
pub const ROLE_KEYWORDS: &[&str] = &[
    "architect",
    "arquiteto",
    "arquiteta",
    "engineer",
    "engenheiro",
    "engenheira",
    "developer",
    "desenvolvedor",
    "desenvolvedora",
    "programmer",
    "programador",
    "analyst",
    "analista",
    "manager",
    "gerente",
    "lead",
    "líder",
    "lider",
    "tech lead",
    "head",
    "director",
    "diretor",
    "diretora",
    "coordinator",
    "coordenador",
    "coordenadora",
    "consultant",
    "consultor",
    "consultora",
    "tester",
    "qa",
    "quality assurance",
    "scrum master",
    "product owner",
    "product manager",
    "designer",
    "intern",
    "estagiário",
    "estagiária",
    "estagiario",
    "trainee",
    "specialist",
    "especialista",
    "administrator",
    "administrador",
    "devops",
    "sre",
    "cto",
    "ceo",
    "founder",
    "co-founder",
    "fundador",
    "scientist",
    "cientista",
    "supervisor",
    "assistant",
    "assistente",
    "technician",
    "técnico",
    "tecnico",
    "auxiliar",
    "dba",
];

/// Legal-entity and company-type tokens.
pub const COMPANY_TYPE_TOKENS: &[&str] = &[
    "ltd",
    "ltda",
    "inc",
    "s.a",
    "sa",
    "s a",
    "corp",
    "corporation",
    "llc",
    "gmbh",
    "co",
    "company",
    "eireli",
    "me",
    "sistemas",
    "software",
    "systems",
    "tecnologia",
    "technologies",
    "technology",
    "tech",
    "consulting",
    "consultoria",
    "solutions",
    "soluções",
    "solucoes",
    "group",
    "grupo",
    "bank",
    "banco",
    "labs",
    "informática",
    "informatica",
    "serviços",
    "services",
];

/// Known employers: `(alias in token form, canonical spelling)`.
pub const KNOWN_COMPANIES: &[(&str, &str)] = &[
    ("senior sistemas", "Senior Sistemas"),
    ("paytrack", "Paytrack"),
    ("totvs", "TOTVS"),
    ("ci&t", "CI&T"),
    ("ciandt", "CI&T"),
    ("stefanini", "Stefanini"),
    ("accenture", "Accenture"),
    ("thoughtworks", "Thoughtworks"),
    ("ibm", "IBM"),
    ("google", "Google"),
    ("microsoft", "Microsoft"),
    ("amazon", "Amazon"),
    ("nubank", "Nubank"),
    ("itaú unibanco", "Itaú Unibanco"),
    ("itau unibanco", "Itaú Unibanco"),
    ("itaú", "Itaú Unibanco"),
    ("itau", "Itaú Unibanco"),
    ("bradesco", "Bradesco"),
    ("petrobras", "Petrobras"),
    ("ambev", "Ambev"),
    ("magazine luiza", "Magazine Luiza"),
    ("magalu", "Magazine Luiza"),
    ("mercado livre", "Mercado Livre"),
    ("mercadolibre", "Mercado Livre"),
    ("weg", "WEG"),
    ("globo", "Globo"),
    ("oracle", "Oracle"),
    ("ifood", "iFood"),
    ("picpay", "PicPay"),
    ("stone pagamentos", "Stone"),
    ("dell technologies", "Dell"),
    ("sap labs", "SAP"),
];

/// Technology dictionary by category. `r` and `go` are left out: as tokens they
/// collide with ordinary words.
pub const TECHNOLOGIES: &[(&str, &[&str])] = &[
    (
        "languages",
        &[
            "java", "python", "javascript", "typescript", "c#", "c++", "golang", "rust", "php",
            "ruby", "swift", "kotlin", "scala", "matlab", "sql",
        ],
    ),
    (
        "frameworks",
        &[
            "spring", "spring boot", "quarkus", "react", "angular", "angularjs", "vue",
            "node.js", "nodejs", "express", "django", "flask", "fastapi", "laravel", "symfony",
            "asp.net", "dotnet", "hibernate",
        ],
    ),
    (
        "databases",
        &[
            "mysql", "postgresql", "postgres", "mongodb", "redis", "elasticsearch", "cassandra",
            "oracle", "sql server", "sqlite", "dynamodb", "aurora",
        ],
    ),
    (
        "cloud",
        &["aws", "azure", "gcp", "digital ocean", "heroku", "vercel", "netlify", "cloudflare"],
    ),
    (
        "infrastructure",
        &[
            "docker", "kubernetes", "terraform", "ansible", "jenkins", "gitlab ci",
            "github actions", "circleci", "travis ci", "kafka", "rabbitmq",
        ],
    ),
    (
        "tools",
        &[
            "git", "jira", "confluence", "postman", "insomnia", "swagger", "openapi", "figma",
            "sketch", "adobe xd",
        ],
    ),
    (
        "methodologies",
        &[
            "agile", "scrum", "kanban", "lean", "devops", "ci cd", "tdd", "bdd",
            "pair programming",
        ],
    ),
];

/// Every technology name in token form, deduplicated, in table order.
pub static TECHNOLOGY_TOKENS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut out: Vec<&'static str> = Vec::new();
    for (_, techs) in TECHNOLOGIES {
        for tech in techs.iter() {
            if !out.contains(tech) {
                out.push(tech);
            }
        }
    }
    out
});

/// Exact cleaned phrases that never name a role or an employer.
pub const TITLE_BLACKLIST: &[&str] = &[
    "curriculum vitae",
    "curriculum",
    "currículo",
    "curriculo",
    "resume",
    "résumé",
    "present",
    "presente",
    "atual",
    "current",
    "full-time",
    "full time",
    "part-time",
    "part time",
    "tempo integral",
    "meio período",
    "confidential",
    "confidencial",
    "page",
    "página",
    "null",
    "none",
    "n/a",
];

/// Institution keywords (token form).
pub const INSTITUTION_KEYWORDS: &[&str] = &[
    "university",
    "universidade",
    "universidad",
    "faculdade",
    "faculty",
    "college",
    "instituto",
    "institute",
    "school",
    "escola",
    "centro universitário",
    "centro universitario",
    "fundação",
    "senai",
    "senac",
    "ifsc",
    "usp",
    "unicamp",
    "furb",
    "udesc",
    "ufsc",
    "puc",
    "fatec",
    "etec",
];

/// Degree-level keywords (token form). Bare "master" is left out so that
/// "Scrum Master" stays a job title.
pub const DEGREE_KEYWORDS: &[&str] = &[
    "bachelor",
    "bachelor's",
    "bacharelado",
    "bacharel",
    "licenciatura",
    "licentiate",
    "master's",
    "masters",
    "master of",
    "master in",
    "mestrado",
    "mba",
    "phd",
    "ph.d",
    "doctorate",
    "doutorado",
    "tecnólogo",
    "tecnologo",
    "graduação",
    "graduacao",
    "pós-graduação",
    "pos-graduação",
    "pós graduação",
    "especialização",
    "especializacao",
    "degree",
    "associate degree",
    "técnico em",
    "bsc",
    "msc",
    "b.sc",
    "m.sc",
];

pub const CERTIFICATION_KEYWORDS: &[&str] = &[
    "certified",
    "certification",
    "certificate",
    "certificação",
    "certificacao",
    "certificado",
    "certificações",
];

/// Employment-type phrases.
pub const EMPLOYMENT_TYPES: &[(&str, EmploymentType)] = &[
    ("full-time", EmploymentType::FullTime),
    ("full time", EmploymentType::FullTime),
    ("tempo integral", EmploymentType::FullTime),
    ("clt", EmploymentType::FullTime),
    ("part-time", EmploymentType::PartTime),
    ("part time", EmploymentType::PartTime),
    ("meio período", EmploymentType::PartTime),
    ("contract", EmploymentType::Contract),
    ("contractor", EmploymentType::Contract),
    ("pj", EmploymentType::Contract),
    ("freelance", EmploymentType::Freelance),
    ("freelancer", EmploymentType::Freelance),
    ("autônomo", EmploymentType::Freelance),
    ("internship", EmploymentType::Internship),
    ("estágio", EmploymentType::Internship),
    ("estagio", EmploymentType::Internship),
];

/// Context words that hint at a skill level, strongest first.
pub const SKILL_LEVEL_INDICATORS: &[(SkillLevel, &[&str])] = &[
    (
        SkillLevel::Expert,
        &[
            "expert", "especialista", "senior", "sênior", "advanced", "avançado", "master",
            "mestre", "proficient", "fluente",
        ],
    ),
    (
        SkillLevel::Intermediate,
        &[
            "intermediate", "intermediário", "mid-level", "pleno", "experienced", "experiente",
            "skilled", "habilidoso",
        ],
    ),
    (
        SkillLevel::Beginner,
        &[
            "beginner", "iniciante", "junior", "júnior", "básico", "basic", "learning",
            "aprendendo", "studying", "estudando",
        ],
    ),
];

/// Spoken languages: `(aliases in token form, canonical English name)`.
pub const SPOKEN_LANGUAGES: &[(&[&str], &str)] = &[
    (&["english", "inglês", "ingles"], "English"),
    (&["portuguese", "português", "portugues"], "Portuguese"),
    (&["spanish", "español", "espanhol"], "Spanish"),
    (&["french", "français", "francês", "frances"], "French"),
    (&["german", "deutsch", "alemão", "alemao"], "German"),
    (&["italian", "italiano"], "Italian"),
];

/// CEFR levels and the words that imply them, highest first.
pub const CEFR_LEVELS: &[(&str, &[&str])] = &[
    ("C2", &["c2", "proficient", "fluent", "native", "nativo", "fluente"]),
    ("C1", &["c1", "advanced", "avançado", "avancado"]),
    ("B2", &["b2", "upper-intermediate", "upper intermediate", "intermediário superior"]),
    ("B1", &["b1", "intermediate", "intermediário", "intermediario"]),
    ("A2", &["a2", "elementary", "elementar"]),
    ("A1", &["a1", "beginner", "iniciante", "básico", "basico"]),
];

/// Characters that separate tokens. Everything else stays inside a token so
/// `c++`, `node.js` and `ci&t` survive intact.
fn is_token_separator(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            ',' | ';' | ':' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '/' | '\\' | '"' | '•'
                | '·' | '▪' | '►' | '●'
        )
}

fn trim_token(token: &str) -> &str {
    token.trim_matches(|c: char| {
        matches!(c, '.' | '-' | '–' | '—' | '\'' | '*' | '!' | '?' | '`' | '“' | '”')
    })
}

/// Lower-cased token form of `text`, padded with one space on each side so that a
/// phrase match is `tokens.contains(" phrase ")`.
pub fn token_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(' ');
    for raw in text.split(is_token_separator) {
        let token = trim_token(raw);
        if token.is_empty() {
            continue;
        }
        out.push_str(&token.to_lowercase());
        out.push(' ');
    }
    out
}

/// Whether the padded token string contains `phrase` (already in token form).
pub fn has_phrase(tokens: &str, phrase: &str) -> bool {
    let mut needle = String::with_capacity(phrase.len() + 2);
    needle.push(' ');
    needle.push_str(phrase);
    needle.push(' ');
    tokens.contains(&needle)
}

pub fn has_any_phrase(tokens: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| has_phrase(tokens, p))
}

/// Distinct technologies mentioned in `text`, in dictionary order. A name that
/// only occurs inside a longer matched name (`sql` in `sql server`) is not
/// counted separately.
pub fn technologies_in(text: &str) -> Vec<&'static str> {
    let tokens = token_string(text);
    let matched: Vec<&'static str> = TECHNOLOGY_TOKENS
        .iter()
        .copied()
        .filter(|tech| has_phrase(&tokens, tech))
        .collect();
    matched
        .iter()
        .copied()
        .filter(|tech| {
            !matched
                .iter()
                .any(|other| other != tech && has_phrase(&format!(" {other} "), tech))
        })
        .collect()
}

/// Canonical employer name when `text` mentions a known company alias.
pub fn known_company(text: &str) -> Option<&'static str> {
    let tokens = token_string(text);
    KNOWN_COMPANIES
        .iter()
        .find(|(alias, _)| has_phrase(&tokens, alias))
        .map(|(_, canonical)| *canonical)
}

// True when every word left is a legal-entity or company-type token.
fn only_company_type_words(rest: &str) -> bool {
    let words: Vec<&str> = rest.split_whitespace().collect();
    let mut i = 0;
    while i < words.len() {
        let pair = words.get(i + 1).map(|next| format!("{} {}", words[i], next));
        if pair.map_or(false, |p| COMPANY_TYPE_TOKENS.contains(&p.as_str())) {
            i += 2;
        } else if COMPANY_TYPE_TOKENS.contains(&words[i]) {
            i += 1;
        } else {
            return false;
        }
    }
    true
}

/// Canonical employer when `text` is a known alias on its own, optionally next
/// to company-type words ("Totvs S/A", "CI&T Software"). "Oracle DBA" mentions
/// an employer without naming one.
pub fn exact_known_company(text: &str) -> Option<&'static str> {
    let tokens = token_string(text);
    KNOWN_COMPANIES.iter().find_map(|(alias, canonical)| {
        let needle = format!(" {alias} ");
        let at = tokens.find(&needle)?;
        let rest = format!("{} {}", &tokens[..at], &tokens[at + needle.len()..]);
        only_company_type_words(&rest).then_some(*canonical)
    })
}

pub fn is_certification_line(text: &str) -> bool {
    has_any_phrase(&token_string(text), CERTIFICATION_KEYWORDS)
}

pub fn has_institution_keyword(text: &str) -> bool {
    has_any_phrase(&token_string(text), INSTITUTION_KEYWORDS)
}

pub fn has_degree_keyword(text: &str) -> bool {
    has_any_phrase(&token_string(text), DEGREE_KEYWORDS)
}

pub fn has_education_keyword(text: &str) -> bool {
    let tokens = token_string(text);
    has_any_phrase(&tokens, INSTITUTION_KEYWORDS) || has_any_phrase(&tokens, DEGREE_KEYWORDS)
}

pub fn has_role_keyword(text: &str) -> bool {
    has_any_phrase(&token_string(text), ROLE_KEYWORDS)
}
