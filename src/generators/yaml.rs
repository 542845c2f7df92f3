//! YAML emitter for `config/agents.yaml` and `config/tasks.yaml`.
//!
//! Each document is a mapping from normalized key to the record's fields.
//! Keys appear in input order and fields in a fixed order, so the output is
//! byte-identical for identical input. Absent optional fields are omitted.
//!
//! crewAI loads these files with a YAML 1.1 parser, which reads plain `yes`,
//! `no`, `on` and `off` as booleans. Such scalars are single-quoted after
//! serialization so they stay strings.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::agent::AgentConfig;
use crate::task::{ContextEntry, TaskConfig};
use crate::utilities::errors::GenerationError;
use crate::utilities::string_utils::normalize_key;

/// One `agents.yaml` entry. Field order is the output order.
#[derive(Serialize)]
struct AgentEntry<'a> {
    role: &'a str,
    goal: &'a str,
    backstory: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    verbose: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allow_delegation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_iter: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_rpm: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    llm: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_reasoning_attempts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    multimodal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allow_code_execution: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_execution_mode: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inject_date: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_format: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_execution_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_retry_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    respect_context_window: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    use_system_prompt: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_template: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt_template: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_template: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_calling_llm: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    guardrail_max_retries: Option<i64>,
}

impl<'a> AgentEntry<'a> {
    fn from_config(agent: &'a AgentConfig, index: usize) -> Result<Self, GenerationError> {
        let required = |value: &'a Option<String>, field: &'static str| {
            value
                .as_deref()
                .ok_or_else(|| GenerationError::missing_agent_field(index + 1, field))
        };
        Ok(Self {
            role: required(&agent.role, "role")?,
            goal: required(&agent.goal, "goal")?,
            backstory: required(&agent.backstory, "backstory")?,
            verbose: agent.verbose,
            allow_delegation: agent.allow_delegation,
            max_iter: agent.max_iter,
            max_rpm: agent.max_rpm,
            cache: agent.cache,
            llm: agent.llm.as_deref(),
            reasoning: agent.reasoning,
            max_reasoning_attempts: agent.max_reasoning_attempts,
            multimodal: agent.multimodal,
            allow_code_execution: agent.allow_code_execution,
            code_execution_mode: agent.code_execution_mode.as_deref(),
            inject_date: agent.inject_date,
            date_format: agent.date_format.as_deref(),
            max_tokens: agent.max_tokens,
            max_execution_time: agent.max_execution_time,
            max_retry_limit: agent.max_retry_limit,
            respect_context_window: agent.respect_context_window,
            use_system_prompt: agent.use_system_prompt,
            system_template: agent.system_template.as_deref(),
            prompt_template: agent.prompt_template.as_deref(),
            response_template: agent.response_template.as_deref(),
            function_calling_llm: agent.function_calling_llm.as_deref(),
            guardrail_max_retries: agent.guardrail_max_retries,
        })
    }
}

/// One `tasks.yaml` entry. Field order is the output order.
#[derive(Serialize)]
struct TaskEntry<'a> {
    description: &'a str,
    expected_output: &'a str,
    agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    async_execution: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    human_input: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    markdown: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_file: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    create_directory: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    guardrail_max_retries: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allow_crewai_trigger_context: Option<bool>,
}

impl<'a> TaskEntry<'a> {
    fn from_config(task: &'a TaskConfig, index: usize) -> Result<Self, GenerationError> {
        let required = |value: &'a Option<String>, field: &'static str| {
            value
                .as_deref()
                .ok_or_else(|| GenerationError::missing_task_field(index + 1, field))
        };

        let context = match &task.context {
            Some(entries) => Some(normalize_context(task, index, entries)?),
            None => None,
        };

        Ok(Self {
            description: required(&task.description, "description")?,
            expected_output: required(&task.expected_output, "expected_output")?,
            agent: normalize_key(required(&task.agent, "agent")?),
            name: task.task_name(),
            context,
            async_execution: task.async_execution,
            human_input: task.human_input,
            markdown: task.markdown,
            output_file: task.output_file.as_deref(),
            create_directory: task.create_directory,
            guardrail_max_retries: task.guardrail_max_retries,
            allow_crewai_trigger_context: task.allow_crewai_trigger_context,
        })
    }
}

fn normalize_context(
    task: &TaskConfig,
    index: usize,
    entries: &[ContextEntry],
) -> Result<Vec<String>, GenerationError> {
    entries
        .iter()
        .map(|entry| match entry {
            ContextEntry::Name(name) => Ok(normalize_key(name)),
            ContextEntry::Other(value) => Err(GenerationError::InvalidContext {
                task: task.key(index),
                value: value.to_string(),
            }),
        })
        .collect()
}

fn insert_entry<T: Serialize>(
    doc: &mut Mapping,
    kind: &str,
    key: String,
    entry: &T,
) -> Result<(), GenerationError> {
    let value = serde_yaml::to_value(entry)?;
    if doc.insert(Value::String(key.clone()), value).is_some() {
        log::warn!("duplicate {} key '{}': later entry replaces earlier one", kind, key);
    }
    Ok(())
}

static YAML11_BOOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:yes|Yes|YES|no|No|NO|on|On|ON|off|Off|OFF|true|True|TRUE|false|False|FALSE)$")
        .unwrap()
});

fn quote_if_bool_word(scalar: &str) -> String {
    if YAML11_BOOL.is_match(scalar) {
        format!("'{}'", scalar)
    } else {
        scalar.to_string()
    }
}

/// Single-quote plain keys, values and sequence items that a YAML 1.1 loader
/// would read as booleans. Lines inside block scalars are left alone.
fn quote_yaml11_bools(yaml: &str) -> String {
    let mut out = String::with_capacity(yaml.len());
    let mut block_indent: Option<usize> = None;

    for line in yaml.lines() {
        let rest = line.trim_start_matches(' ');
        let indent = line.len() - rest.len();

        if let Some(parent) = block_indent {
            if rest.is_empty() || indent > parent {
                out.push_str(line);
                out.push('\n');
                continue;
            }
            block_indent = None;
        }

        let (marker, item) = match rest.strip_prefix("- ") {
            Some(item) => ("- ", item),
            None => ("", rest),
        };
        let rewritten = if let Some((key, value)) = item.split_once(": ") {
            if value.starts_with('|') || value.starts_with('>') {
                block_indent = Some(indent);
            }
            format!("{}: {}", quote_if_bool_word(key), quote_if_bool_word(value))
        } else if let Some(key) = item.strip_suffix(':') {
            format!("{}:", quote_if_bool_word(key))
        } else {
            quote_if_bool_word(item)
        };

        out.push_str(&line[..indent]);
        out.push_str(marker);
        out.push_str(&rewritten);
        out.push('\n');
    }
    out
}

/// Render `agents.yaml`.
///
/// Keys are normalized roles. Two agents with the same key collapse into one
/// entry holding the later agent's fields at the earlier agent's position.
pub fn generate_agents_yaml(agents: &[AgentConfig]) -> Result<String, GenerationError> {
    let mut doc = Mapping::new();
    for (i, agent) in agents.iter().enumerate() {
        let entry = AgentEntry::from_config(agent, i)?;
        insert_entry(&mut doc, "agent", normalize_key(entry.role), &entry)?;
    }
    log::debug!("emitted agents.yaml with {} entries", doc.len());
    Ok(quote_yaml11_bools(&serde_yaml::to_string(&doc)?))
}

/// Render `tasks.yaml`.
///
/// Keys are normalized task names, `task_{n}` for unnamed tasks. The `agent`
/// value and every `context` entry are normalized the same way.
pub fn generate_tasks_yaml(tasks: &[TaskConfig]) -> Result<String, GenerationError> {
    let mut doc = Mapping::new();
    for (i, task) in tasks.iter().enumerate() {
        let entry = TaskEntry::from_config(task, i)?;
        insert_entry(&mut doc, "task", task.key(i), &entry)?;
    }
    log::debug!("emitted tasks.yaml with {} entries", doc.len());
    Ok(quote_yaml11_bools(&serde_yaml::to_string(&doc)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_agents_yaml_layout() {
        let mut agent = AgentConfig::new("Senior Researcher", "Find facts", "Curious");
        agent.llm = Some("gpt-4".into());
        agent.verbose = Some(true);
        agent.max_iter = Some(10);

        let yaml = generate_agents_yaml(&[agent]).unwrap();
        assert_eq!(
            yaml,
            "senior_researcher:\n  role: Senior Researcher\n  goal: Find facts\n  backstory: Curious\n  verbose: true\n  max_iter: 10\n  llm: gpt-4\n"
        );
    }

    #[test]
    fn test_agents_keep_input_order() {
        let agents = vec![
            AgentConfig::new("Zed", "g", "b"),
            AgentConfig::new("Alpha", "g", "b"),
        ];
        let yaml = generate_agents_yaml(&agents).unwrap();
        let zed = yaml.find("zed:").unwrap();
        let alpha = yaml.find("alpha:").unwrap();
        assert!(zed < alpha);
    }

    #[test]
    fn test_duplicate_agent_keys_collapse() {
        let agents = vec![
            AgentConfig::new("Writer", "first", "b"),
            AgentConfig::new("Editor", "g", "b"),
            AgentConfig::new("writer", "second", "b"),
        ];
        let yaml = generate_agents_yaml(&agents).unwrap();
        let doc: Mapping = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(doc.len(), 2);
        let keys: Vec<&str> = doc.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, ["writer", "editor"]);
        assert_eq!(doc["writer"]["goal"], Value::from("second"));
    }

    #[test]
    fn test_missing_required_agent_field() {
        let mut agent = AgentConfig::new("Writer", "g", "b");
        agent.backstory = None;
        let err = generate_agents_yaml(&[AgentConfig::new("A", "g", "b"), agent]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Agent 2: required field 'backstory' is missing"
        );
    }

    #[test]
    fn test_tasks_yaml_normalizes_agent_and_context() {
        let first = TaskConfig::new("research_task", "Research {topic}", "Notes", "Research Agent");
        let mut second = TaskConfig::new("analysis_task", "Analyse", "Report", "Analysis Agent")
            .with_context(["Research Task"]);
        second.output_file = Some("report.md".into());

        let yaml = generate_tasks_yaml(&[first, second]).unwrap();
        assert_eq!(
            yaml,
            "research_task:\n  description: Research {topic}\n  expected_output: Notes\n  agent: research_agent\n  name: research_task\nanalysis_task:\n  description: Analyse\n  expected_output: Report\n  agent: analysis_agent\n  name: analysis_task\n  context:\n  - research_task\n  output_file: report.md\n"
        );
    }

    #[test]
    fn test_unnamed_task_and_empty_context() {
        let mut task = TaskConfig::new("", "d", "o", "Writer");
        task.context = Some(Vec::new());
        let yaml = generate_tasks_yaml(&[task]).unwrap();
        assert_eq!(
            yaml,
            "task_1:\n  description: d\n  expected_output: o\n  agent: writer\n  context: []\n"
        );
    }

    #[test]
    fn test_non_string_context_fails() {
        let mut task = TaskConfig::new("t", "d", "o", "Writer");
        task.context = Some(vec![ContextEntry::Other(serde_json::json!(7))]);
        let err = generate_tasks_yaml(&[task]).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidContext { .. }));
    }

    #[test]
    fn test_yaml11_bool_words_are_quoted() {
        let mut agent = AgentConfig::new("On", "no", "yes");
        agent.verbose = Some(true);
        agent.llm = Some("Off".into());
        let yaml = generate_agents_yaml(&[agent]).unwrap();

        assert!(yaml.starts_with("'on':\n"));
        assert!(yaml.contains("  goal: 'no'\n"));
        assert!(yaml.contains("  backstory: 'yes'\n"));
        assert!(yaml.contains("  verbose: true\n"));
        assert!(yaml.contains("  llm: 'Off'\n"));

        let doc: Mapping = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(doc["on"]["backstory"], Value::from("yes"));
        assert_eq!(doc["on"]["verbose"], Value::from(true));
    }

    #[test]
    fn test_yaml11_bool_words_in_context_list() {
        let task = TaskConfig::new("report", "d", "o", "Writer").with_context(["No"]);
        let yaml = generate_tasks_yaml(&[task]).unwrap();
        assert!(yaml.contains("  context:\n  - 'no'\n"));
    }

    #[test]
    fn test_block_scalar_lines_untouched() {
        let agent = AgentConfig::new("Writer", "g", "first line\nyes\nkey: off");
        let yaml = generate_agents_yaml(&[agent]).unwrap();
        let doc: Mapping = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(
            doc["writer"]["backstory"],
            Value::from("first line\nyes\nkey: off")
        );
    }

    #[test]
    fn test_missing_task_agent() {
        let mut task = TaskConfig::new("t", "d", "o", "Writer");
        task.agent = None;
        let err = generate_tasks_yaml(&[task]).unwrap_err();
        assert_eq!(err.to_string(), "Task 1: required field 'agent' is missing");
    }
}
