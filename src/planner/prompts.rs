//! 费用估算与最终报告的prompt模板

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

/// 费用估算失败时的兜底文本
pub const EXPENSE_FALLBACK: &str =
    "Failed to generate report. Please check the input data or try again later.";

/// 最终报告失败时的兜底文本
pub const REPORT_FALLBACK: &str = "Failed to generate report.";

pub const EXPENSE_SYSTEM_PROMPT: &str = "You are an expert in planning and managing travel and tour budgets. You receive structured data gathered for a trip to one city and turn it into a realistic cost estimate.";

pub const EXPENSE_USER_TEMPLATE: &str = r#"Trip details:

City Name: {city_name}
Currency: {currency}
Number of Days: {num_days}

Flights (price and duration of each offer):
{flight_info}

Hotels (nightly rates):
{hotel_info}

Local transportation options in the city:
{transport_info}

Restaurants (approximate cost per meal per person):
{restaurant_info}

Attractions (ticket prices or estimated entry fees when known):
{attraction_info}

🎯 Task:
Write an Expense Report for 1 person in {currency}, using exactly these lines:
Flight Cost: XXX
Average Transportation Cost for {num_days} day(s): XXX
Average Restaurant Food Cost for {num_days} day(s): XXX
Average Hotel Cost for {num_days} day(s): XXX
Average Ticket Cost for Attractions/Fun Activities: XXX

Convert any amount quoted in another currency into {currency} using approximate exchange rates.

Then provide:
✅ Total Estimated Trip Cost
📊 Breakdown (in {currency})

Keep every value realistic for the data above. Average over multiple items where needed and approximate when an exact value is missing.
"#;

pub const REPORT_SYSTEM_PROMPT: &str = "You are an expert travel planner and report writer. You turn detailed trip data into a well-structured, friendly travel report in Markdown.";

pub const REPORT_USER_TEMPLATE: &str = r#"### ✈️ Trip Overview
- **Origin City**: {origin_city}
- **Destination City**: {destination_city}
- **Trip Duration**: {num_days} days
- **Date of Travel**: {outbound_date} to {return_date}

---

🛫 Flight Details:
Summarise the best flight option(s): price, airline, departure and arrival time, duration.
{flight_info}

🌦️ Weather Forecast in {destination_city}:
Summarise the conditions so the traveller can pack appropriately.
{weather_info}

🏞️ Tourist Attractions & Fun Activities in {destination_city}:
Highlight the top places to visit, entry fees and local cultural experiences.
{attraction_info}

🍽️ Restaurant Recommendations in {destination_city}:
List 4-5 of the best rated restaurants with cuisine, price range and location.
{restaurant_info}

🏨 Hotel Options in {destination_city}:
List 3-5 recommended hotels with nightly rate, rating and location benefits.
{hotel_info}

🚇 Local Transportation in {destination_city}:
Summarise metro, bus and cab options with the average cost per ride or per day.
{transport_info}

💰 Expense Summary:
Present the cost breakdown and the total estimated cost of the trip.
{expense_report_text}

Convert any amount quoted in another currency into {currency} using approximate exchange rates.

📋 Final Travel Report:
Combine the sections above into one report with a clear heading structure (`#`, `##`), bullet points, realistic and consistent costs, weather warnings and practical travel tips.
"#;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").unwrap());

/// 单遍替换模板中的 `{name}` 占位符，未提供的占位符原样保留。
/// 替换进来的内容不会被再次展开。
pub fn render_template(template: &str, values: &[(&str, String)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// 以缩进JSON形式嵌入数据集
pub fn format_dataset<T>(data: &T) -> String
where
    T: Serialize + ?Sized,
{
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "null".to_string())
}

/// 在系统提示词后附加语言指令
pub fn with_language_instruction(system_prompt: &str, instruction: &str) -> String {
    format!("{}\n\n{}", system_prompt, instruction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_template_substitutes_every_occurrence() {
        let rendered = render_template(
            "{num_days} day(s) in {city_name}, {num_days} nights",
            &[("city_name", "Hyderabad".to_string()), ("num_days", "3".to_string())],
        );
        assert_eq!(rendered, "3 day(s) in Hyderabad, 3 nights");
    }

    #[test]
    fn test_render_template_keeps_unknown_placeholders() {
        let rendered = render_template("{city_name} {unknown}", &[("city_name", "Goa".to_string())]);
        assert_eq!(rendered, "Goa {unknown}");
    }

    #[test]
    fn test_inserted_values_are_not_expanded_again() {
        let rendered = render_template(
            "{hotel_info} / {currency}",
            &[
                ("hotel_info", "{currency}".to_string()),
                ("currency", "INR".to_string()),
            ],
        );
        assert_eq!(rendered, "{currency} / INR");
    }

    #[test]
    fn test_expense_template_has_no_leftover_placeholders() {
        let values = [
            ("city_name", "Hyderabad".to_string()),
            ("currency", "INR".to_string()),
            ("num_days", "3".to_string()),
            ("flight_info", "[]".to_string()),
            ("hotel_info", "[]".to_string()),
            ("transport_info", "[]".to_string()),
            ("restaurant_info", "[]".to_string()),
            ("attraction_info", "[]".to_string()),
        ];
        let rendered = render_template(EXPENSE_USER_TEMPLATE, &values);
        assert!(!PLACEHOLDER.is_match(&rendered));
        assert!(rendered.contains("Expense Report for 1 person in INR"));
        assert!(rendered.contains("Average Hotel Cost for 3 day(s): XXX"));
    }

    #[test]
    fn test_format_dataset_is_pretty_json() {
        let formatted = format_dataset(&json!([{"name": "Charminar"}]));
        assert_eq!(formatted, "[\n  {\n    \"name\": \"Charminar\"\n  }\n]");
    }
}
