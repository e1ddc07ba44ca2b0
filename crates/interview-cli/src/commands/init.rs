//! The `interview init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("interview.toml").exists() {
        println!("interview.toml already exists, skipping.");
    } else {
        std::fs::write("interview.toml", SAMPLE_CONFIG)?;
        println!("Created interview.toml");
    }

    std::fs::create_dir_all("questions")?;
    let example_path = std::path::Path::new("questions/example.json");
    if example_path.exists() {
        println!("questions/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_CATALOG)?;
        println!("Created questions/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Start the embedding service, or set [similarity] type = \"disabled\"");
    println!("  2. Run: interview validate");
    println!("  3. Run: interview run --role backend --experience junior");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# interview configuration

catalog = "questions/example.json"
session_size = 10
output_dir = "./interview-results"
parallelism = 4

[evaluation]
min_answer_chars = 10
skip_marker = "— skipped —"

[similarity]
type = "http"
base_url = "http://localhost:8000"
timeout_secs = 5
"#;

const EXAMPLE_CATALOG: &str = r#"[
  {
    "question": "What is a Spring Bean?",
    "idealAnswer": "A Spring bean is an object that is instantiated, assembled and managed by the Spring IoC container.",
    "requiredConcepts": ["object", "IoC container", "managed"],
    "advancedConcepts": ["bean scope"],
    "difficulty": "easy",
    "experience": "junior",
    "role": "backend"
  },
  {
    "question": "How does HashMap work internally in Java?",
    "idealAnswer": "Keys are hashed into buckets; equals resolves collisions and crowded buckets become trees.",
    "requiredConcepts": ["hashCode", "bucket", "equals"],
    "advancedConcepts": ["load factor", "treeify"],
    "difficulty": "medium",
    "experience": "mid",
    "role": "backend"
  },
  {
    "question": "Explain the saga pattern for distributed transactions.",
    "idealAnswer": "A saga is a sequence of local transactions, with compensating transactions undoing completed steps on failure.",
    "requiredConcepts": ["local transaction", "compensating"],
    "advancedConcepts": ["orchestration", "choreography"],
    "difficulty": "hard",
    "experience": "senior",
    "role": "backend"
  }
]
"#;
