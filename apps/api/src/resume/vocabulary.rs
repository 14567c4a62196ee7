//! Static vocabularies for résumé scanning: recognised skills, job-role words,
//! education words, and the skill sets behind each suggested role.
//!
//! Built once (see [`Vocabulary::builtin`]) and only ever read afterwards.

use std::sync::LazyLock;

use regex::Regex;

const SKILLS: &[&str] = &[
    // Programming languages
    "python", "java", "javascript", "typescript", "c++", "c#", "ruby", "php", "swift",
    "kotlin", "go", "rust", "scala", "r", "matlab", "perl", "shell", "bash",
    // Web
    "html", "css", "react", "angular", "vue", "node.js", "express", "django", "flask",
    "spring", "asp.net", "jquery", "bootstrap", "tailwind", "webpack", "npm", "yarn",
    // Databases
    "sql", "mysql", "postgresql", "mongodb", "redis", "oracle", "sqlite", "cassandra",
    "dynamodb", "elasticsearch", "neo4j", "firebase",
    // Cloud & DevOps
    "aws", "azure", "gcp", "docker", "kubernetes", "jenkins", "gitlab", "github",
    "terraform", "ansible", "ci/cd", "devops", "cloud",
    // Data science & ML
    "machine learning", "deep learning", "tensorflow", "pytorch", "keras", "scikit-learn",
    "pandas", "numpy", "data analysis", "data science", "nlp", "computer vision",
    "artificial intelligence", "ai", "ml", "neural networks",
    // Engineering disciplines
    "electrical engineering", "mechanical engineering", "civil engineering",
    "chemical engineering", "computer engineering", "software engineering",
    "systems engineering", "industrial engineering", "aerospace engineering",
    // Engineering tools
    "autocad", "solidworks", "simulink", "plc", "scada", "pcb design",
    "circuit design", "embedded systems", "microcontrollers", "fpga", "vhdl", "verilog",
    "cad", "fem", "cfd", "ansys", "catia",
    // Business & management
    "project management", "agile", "scrum", "kanban", "product management",
    "business analysis", "excel", "powerpoint", "tableau",
    "power bi", "salesforce", "sap", "erp", "crm",
    // Other technical
    "linux", "unix", "windows", "macos", "git", "api", "rest", "graphql",
    "microservices", "testing", "debugging", "troubleshooting",
];

const JOB_ROLE_KEYWORDS: &[&str] = &[
    "software", "developer", "engineer", "programmer", "architect", "analyst",
    "scientist", "researcher", "manager", "director", "lead", "senior",
    "junior", "intern", "consultant", "specialist", "technician", "designer",
    "administrator", "coordinator", "supervisor",
];

const EDUCATION_KEYWORDS: &[&str] = &[
    "bachelor", "master", "phd", "doctorate", "degree", "university", "college",
    "bs", "ba", "ms", "ma", "mba", "engineering", "science", "arts", "technology",
    "computer science", "electrical engineering", "mechanical engineering",
    "business administration", "mathematics", "physics", "chemistry",
];

/// Role → skills that signal it. Some required skills ("programming", "pcb")
/// are outside the skill list and can never be matched; they still count in
/// the denominator.
const ROLE_MAPPINGS: &[(&str, &[&str])] = &[
    ("Software Engineer", &["python", "java", "javascript", "programming", "software"]),
    ("Data Scientist", &["python", "machine learning", "data analysis", "tensorflow", "pandas"]),
    ("DevOps Engineer", &["docker", "kubernetes", "aws", "azure", "ci/cd", "jenkins"]),
    ("Full Stack Developer", &["react", "node.js", "javascript", "html", "css", "mongodb"]),
    ("Frontend Developer", &["react", "angular", "vue", "javascript", "html", "css"]),
    ("Backend Developer", &["python", "java", "node.js", "sql", "api", "rest"]),
    (
        "Machine Learning Engineer",
        &["machine learning", "tensorflow", "pytorch", "python", "deep learning"],
    ),
    (
        "Electrical Engineer",
        &["electrical engineering", "circuit design", "pcb", "embedded systems"],
    ),
    (
        "Mechanical Engineer",
        &["mechanical engineering", "autocad", "solidworks", "cad"],
    ),
    (
        "Business Analyst",
        &["business analysis", "sql", "excel", "data analysis", "tableau"],
    ),
    (
        "Product Manager",
        &["product management", "agile", "scrum", "project management"],
    ),
    ("Cloud Engineer", &["aws", "azure", "gcp", "cloud", "terraform"]),
];

static BUILTIN: LazyLock<Vocabulary> = LazyLock::new(|| {
    Vocabulary::new(SKILLS, JOB_ROLE_KEYWORDS, EDUCATION_KEYWORDS, ROLE_MAPPINGS)
        .expect("built-in skill patterns are valid")
});

/// A skill plus the compiled pattern used to find it in free text.
#[derive(Debug)]
pub struct SkillPattern {
    pub skill: &'static str,
    pub pattern: Regex,
}

/// A named role and the skills that signal it.
#[derive(Debug, Clone, Copy)]
pub struct RoleMapping {
    pub role: &'static str,
    pub required_skills: &'static [&'static str],
}

#[derive(Debug)]
pub struct Vocabulary {
    skills: Vec<SkillPattern>,
    job_role_keywords: &'static [&'static str],
    education_keywords: &'static [&'static str],
    role_mappings: Vec<RoleMapping>,
}

impl Vocabulary {
    pub fn new(
        skills: &'static [&'static str],
        job_role_keywords: &'static [&'static str],
        education_keywords: &'static [&'static str],
        role_mappings: &'static [(&'static str, &'static [&'static str])],
    ) -> Result<Self, regex::Error> {
        let skills = skills
            .iter()
            .map(|&skill| {
                Ok(SkillPattern {
                    skill,
                    pattern: skill_pattern(skill)?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let role_mappings = role_mappings
            .iter()
            .map(|&(role, required_skills)| RoleMapping {
                role,
                required_skills,
            })
            .collect();

        Ok(Self {
            skills,
            job_role_keywords,
            education_keywords,
            role_mappings,
        })
    }

    /// The process-wide default vocabulary.
    pub fn builtin() -> &'static Vocabulary {
        &BUILTIN
    }

    pub fn skills(&self) -> &[SkillPattern] {
        &self.skills
    }

    pub fn skill_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.skills.iter().map(|s| s.skill)
    }

    pub fn job_role_keywords(&self) -> &[&'static str] {
        self.job_role_keywords
    }

    pub fn education_keywords(&self) -> &[&'static str] {
        self.education_keywords
    }

    pub fn role_mappings(&self) -> &[RoleMapping] {
        &self.role_mappings
    }
}

/// Builds a case-insensitive whole-word pattern for a skill.
///
/// Hyphens match a hyphen, a whitespace char, or nothing ("scikit learn",
/// "scikitlearn"). `\b` is only asserted on sides that end in a word char; a
/// skill ending in punctuation ("c++", "c#") instead needs a non-word char or
/// the end of text after it, so "c++" is not found inside "c++x".
pub fn skill_pattern(skill: &str) -> Result<Regex, regex::Error> {
    let body = skill
        .split('-')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"[-\s]?");

    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let lead = match skill.chars().next() {
        Some(c) if is_word(c) => r"\b",
        _ => "",
    };
    let trail = match skill.chars().last() {
        Some(c) if is_word(c) => r"\b",
        _ => r"(?:\W|$)",
    };

    Regex::new(&format!("(?i){lead}{body}{trail}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_no_duplicate_skills() {
        let vocab = Vocabulary::builtin();
        let mut names: Vec<&str> = vocab.skill_names().collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_pattern_rejects_partial_words() {
        let docker = skill_pattern("docker").unwrap();
        assert!(docker.is_match("Docker, Kubernetes"));
        assert!(!docker.is_match("dockerized services"));

        let r = skill_pattern("r").unwrap();
        assert!(!r.is_match("react"));
        assert!(r.is_match("statistics in R and Python"));
    }

    #[test]
    fn test_pattern_hyphen_accepts_space_or_nothing() {
        let p = skill_pattern("scikit-learn").unwrap();
        assert!(p.is_match("scikit-learn"));
        assert!(p.is_match("Scikit Learn"));
        assert!(p.is_match("scikitlearn"));
    }

    #[test]
    fn test_pattern_handles_punctuated_skills() {
        let cpp = skill_pattern("c++").unwrap();
        assert!(cpp.is_match("C++, Java"));
        assert!(cpp.is_match("modern c++"));
        assert!(!cpp.is_match("c++x"));

        let node = skill_pattern("node.js").unwrap();
        assert!(node.is_match("Node.js services"));
        assert!(!node.is_match("nodexjs"));

        let cicd = skill_pattern("ci/cd").unwrap();
        assert!(cicd.is_match("owned the CI/CD pipeline"));
    }

    #[test]
    fn test_role_mappings_are_nonempty() {
        let vocab = Vocabulary::builtin();
        assert_eq!(vocab.role_mappings().len(), 12);
        assert!(vocab
            .role_mappings()
            .iter()
            .all(|m| !m.required_skills.is_empty()));
    }
}
