use serde::Serialize;

use roadmap_db::models::Week;

#[derive(Serialize)]
struct PlanContext<'a> {
    title: &'a str,
    goal: &'a str,
    weeks: &'a [Week],
}

/// Build the single user message sent to the feedback model.
///
/// The whole plan is embedded as JSON so the model sees the task in context.
/// The reply is asked to wrap its advice in `&&&{code}&&&`; callers keep the
/// reply verbatim and do not strip those markers.
pub fn feedback_prompt(
    title: &str,
    goal: &str,
    weeks: &[Week],
    task_content: &str,
    comment: &str,
) -> serde_json::Result<String> {
    let plan = serde_json::to_string(&PlanContext { title, goal, weeks })?;
    Ok(format!(
        "You are a senior teacher of software development. Here is my study plan: {plan}. \
         This is the task I have questions about: {task_content}. \
         And this is my comment: {comment}. \
         Please give me suitable advice to help me study better, \
         and wrap the concrete advice in &&&{{code}}&&& when you send it to me."
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn prompt_embeds_plan_task_and_comment() {
        let weeks: Vec<Week> = serde_json::from_value(json!([
            {"week": 1, "days": [{"day": 1, "tasks": [
                {"task_id": "week1_day1_a", "content": "Read ch.1"}
            ]}]}
        ]))
        .unwrap();

        let prompt = feedback_prompt("Intro", "Learn X", &weeks, "Read ch.1", "too long").unwrap();

        assert!(prompt.contains(r#""title":"Intro""#));
        assert!(prompt.contains(r#""goal":"Learn X""#));
        assert!(prompt.contains(r#""task_id":"week1_day1_a""#));
        assert!(prompt.contains("questions about: Read ch.1."));
        assert!(prompt.contains("my comment: too long."));
        assert!(prompt.contains("&&&{code}&&&"));
    }

    #[test]
    fn non_ascii_is_not_escaped() {
        let prompt = feedback_prompt("入门", "学习", &[], "阅读", "太难").unwrap();
        assert!(prompt.contains("入门"));
        assert!(!prompt.contains("\\u"));
    }
}
