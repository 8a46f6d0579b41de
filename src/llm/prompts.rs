//! Review prompt template.

use crate::git::CommitRecord;

/// Closed set of review recommendations the model may return.
pub const REVIEW_RECOMMENDATIONS: [&str; 3] = ["Required", "Optional", "Not Needed"];

/// Opening line of the prompt.
const REVIEWER_ROLE: &str =
    "You are a senior DevOps engineer reviewing a code submission before it is merged.";

/// Renders every field of `record` verbatim as plain text.
pub fn render_commit(record: &CommitRecord) -> String {
    let stats = &record.stats;
    let mut out = String::new();

    out.push_str(&format!("hash: {}\n", record.id));
    out.push_str(&format!("author: {}\n", record.author));
    out.push_str(&format!("committed_date: {}\n", record.timestamp));
    out.push_str("message:\n");
    out.push_str(&record.message);
    if !record.message.ends_with('\n') {
        out.push('\n');
    }

    out.push_str(&format!("files_changed ({}):\n", record.files_changed.len()));
    for file in &record.files_changed {
        out.push_str(&format!("  {file}\n"));
    }

    out.push_str(&format!(
        "statistics: files={} insertions={} deletions={} lines={}\n",
        stats.files, stats.insertions, stats.deletions, stats.lines
    ));
    out.push_str("diff:\n");
    out.push_str(&record.diff_text);

    out
}

/// Builds the full review prompt for `record`.
pub fn build_prompt(record: &CommitRecord) -> String {
    let recommendations = REVIEW_RECOMMENDATIONS.join(" / ");

    format!(
        r"{REVIEWER_ROLE}
Here is the commit information:
{commit}
Please analyze this commit and provide the following:
1. A short, human-readable summary of what was changed.
2. Highlight any risky or sensitive changes (e.g., auth, deletion, major refactor).
3. Assign a risk score from 1 (low) to 10 (high) based on the magnitude and sensitivity of the changes.
4. Recommend whether this commit should be reviewed manually before merging.
Respond in the following format:
---
Summary: <summary>
Risk Factors: <bullet list or 'None'>
Risk Score: <1-10>
Review Recommendation: <{recommendations}>
---
",
        commit = render_commit(record),
    )
}
