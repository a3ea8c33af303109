//! Prompt construction.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::goal::Goal;

const SPLIT_GUIDELINES: &str = "Investment Strategy Guidelines:

Equity Mutual Funds are ideal for:
- Long-term wealth creation (5-15 years)
- Retirement corpus building
- Funding higher education or house down payment (5+ years)
- Age: 20-40 years
- Risk Tolerance: Medium to High
- Time Horizon: Long-term (at least 5-10 years)

Debt Mutual Funds are ideal for:
- Short to medium-term savings (1-5 years)
- Emergency fund or contingency planning
- Regular income or capital protection
- Age: 35+ years
- Risk Tolerance: Low to Moderate
- Time Horizon: Short to medium term (6 months to 5 years)";

const SPLIT_ANSWER_FORMAT: &str = r#"Based on the user's questionnaire answers and goal details, determine the optimal equity/debt percentage split.

Respond with ONLY a JSON object in this exact format (no other text):
{
  "percentage_equity": <number between 0 and 100>,
  "percentage_debt": <number between 0 and 100>
}

The percentages must sum to exactly 100."#;

/// Opening instructions for the coaching chat.
pub const CHAT_SYSTEM_PROMPT: &str = "You are a helpful financial assistant and teacher. Your role is to:
1. Explain financial concepts in simple, easy-to-understand terms
2. Provide thoughtful advice about spending decisions
3. Help users understand their financial situation better
4. Be supportive and educational, not preachy

When answering questions about purchases or expenditures, consider:
- The user's financial goals and current situation
- Whether the purchase aligns with their budget
- Long-term financial implications
- Provide both pros and cons when appropriate

Keep responses conversational, helpful, and educational.";

/// Builds the split prompt for a goal.
#[must_use]
pub fn split_prompt(goal: &Goal, answers: Option<&Value>) -> String {
    let questionnaire = answers
        .filter(|v| !v.is_null())
        .and_then(|v| serde_json::to_string_pretty(v).ok())
        .map_or_else(
            || "No questionnaire answers provided".to_string(),
            |json| format!("User Questionnaire Answers:\n{json}"),
        );

    let description = goal
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("No description provided");

    format!(
        "You are a financial advisor helping determine the optimal equity/debt split for a user's investment goal.

{questionnaire}

Goal Details:
- Name: {name}
- Description: {description}
- Target Amount: ${target}

{SPLIT_GUIDELINES}

{SPLIT_ANSWER_FORMAT}",
        name = goal.name,
        target = format_amount(goal.target_amount),
    )
}

/// Formats an amount with thousands separators, e.g. `12,500.5`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let plain = amount.normalize().to_string();
    let (sign, unsigned) = plain
        .strip_prefix('-')
        .map_or(("", plain.as_str()), |rest| ("-", rest));
    let (whole, fraction) = unsigned
        .split_once('.')
        .map_or((unsigned, None), |(w, f)| (w, Some(f)));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nestegg_shared::{GoalId, UserId};
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn goal(description: Option<&str>) -> Goal {
        Goal {
            id: GoalId::new(),
            user_id: UserId::new(),
            name: "Retirement".to_string(),
            description: description.map(str::to_string),
            target_amount: dec!(1250000),
            current_amount: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    #[case(dec!(0), "0")]
    #[case(dec!(999), "999")]
    #[case(dec!(1000), "1,000")]
    #[case(dec!(1250000), "1,250,000")]
    #[case(dec!(12500.50), "12,500.5")]
    #[case(dec!(-4200), "-4,200")]
    fn test_format_amount(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_amount(amount), expected);
    }

    #[test]
    fn test_split_prompt_embeds_goal_and_answers() {
        let answers = json!({"age": 29, "risk_tolerance": "high"});
        let prompt = split_prompt(&goal(Some("Retire by 55")), Some(&answers));

        assert!(prompt.contains("- Name: Retirement"));
        assert!(prompt.contains("- Description: Retire by 55"));
        assert!(prompt.contains("- Target Amount: $1,250,000"));
        assert!(prompt.contains("User Questionnaire Answers:\n{\n  \"age\": 29"));
        assert!(prompt.contains("\"percentage_equity\""));
        assert!(prompt.contains("Risk Tolerance: Low to Moderate"));
    }

    #[test]
    fn test_split_prompt_placeholders() {
        let prompt = split_prompt(&goal(None), None);
        assert!(prompt.contains("No description provided"));
        assert!(prompt.contains("No questionnaire answers provided"));

        let prompt = split_prompt(&goal(Some("   ")), Some(&Value::Null));
        assert!(prompt.contains("No description provided"));
        assert!(prompt.contains("No questionnaire answers provided"));
    }
}
