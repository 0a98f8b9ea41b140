mod types;

use chrono::NaiveDate;
use log::debug;
pub use types::*;

use crate::error::{Error, Result};
use crate::stats::ActivityRecord;

const GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";
const USER_AGENT: &str = "streak-stats";

/// Fetch a user's complete public contribution history as per-day records.
///
/// The GraphQL API caps one contribution calendar at a year, so this first
/// resolves the user's contribution years, then queries each calendar and
/// flattens the weeks. Days after `today` (the calendar pads out the current
/// week) are dropped.
pub async fn fetch_contributions(
    client: &reqwest::Client,
    token: &str,
    user: &str,
    today: NaiveDate,
) -> Result<Vec<ActivityRecord>> {
    let mut years = fetch_contribution_years(client, token, user).await?;
    years.sort_unstable();
    debug!("User {} has contribution years {:?}", user, years);

    let mut records = Vec::new();
    for year in years {
        let days = fetch_calendar_year(client, token, user, year).await?;
        records.extend(
            days.into_iter()
                .filter(|day| day.date <= today)
                .map(|day| ActivityRecord {
                    date: day.date,
                    count: day.contribution_count,
                }),
        );
    }

    debug!("Fetched {} contribution days for {}", records.len(), user);
    Ok(records)
}

async fn fetch_contribution_years(
    client: &reqwest::Client,
    token: &str,
    user: &str,
) -> Result<Vec<i32>> {
    let query = format!(
        r#"
        query {{
            user(login: "{user}") {{
                contributionsCollection {{
                    contributionYears
                }}
            }}
        }}
    "#
    );

    let data: YearsData = execute_query(client, token, &query, user).await?;
    let user_data = data
        .user
        .ok_or_else(|| Error::UserNotFound(user.to_string()))?;
    Ok(user_data.contributions_collection.contribution_years)
}

async fn fetch_calendar_year(
    client: &reqwest::Client,
    token: &str,
    user: &str,
    year: i32,
) -> Result<Vec<ContributionDay>> {
    debug!("Fetching {} contribution calendar for {}", year, user);
    let query = format!(
        r#"
        query {{
            user(login: "{user}") {{
                contributionsCollection(from: "{year}-01-01T00:00:00Z", to: "{year}-12-31T23:59:59Z") {{
                    contributionCalendar {{
                        totalContributions
                        weeks {{
                            contributionDays {{
                                date
                                contributionCount
                            }}
                        }}
                    }}
                }}
            }}
        }}
    "#
    );

    let data: CalendarData = execute_query(client, token, &query, user).await?;
    let user_data = data
        .user
        .ok_or_else(|| Error::UserNotFound(user.to_string()))?;
    Ok(user_data
        .contributions_collection
        .contribution_calendar
        .weeks
        .into_iter()
        .flat_map(|week| week.contribution_days)
        .collect())
}

/// Execute a GraphQL query and map the response envelope into the crate's
/// error taxonomy.
async fn execute_query<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    token: &str,
    query: &str,
    user: &str,
) -> Result<T> {
    let body = serde_json::json!({
        "query": query
    });

    debug!("Sending GraphQL request to GitHub API");

    let response: GraphQLResponse<T> = client
        .post(GRAPHQL_ENDPOINT)
        .header("Authorization", format!("Bearer {}", token))
        .header("User-Agent", USER_AGENT)
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::Fetch(e.to_string()))?
        .json()
        .await
        .map_err(|e| Error::Fetch(e.to_string()))?;

    if let Some(errors) = response.errors {
        if errors
            .iter()
            .any(|e| e.error_type.as_deref() == Some("NOT_FOUND"))
        {
            return Err(Error::UserNotFound(user.to_string()));
        }
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        return Err(Error::Fetch(messages.join(", ")));
    }

    response
        .data
        .ok_or_else(|| Error::Fetch("no data in response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_response_deserializes() {
        let raw = r#"{
            "data": {
                "user": {
                    "contributionsCollection": {
                        "contributionCalendar": {
                            "totalContributions": 3,
                            "weeks": [
                                { "contributionDays": [
                                    { "date": "2023-05-01", "contributionCount": 2 },
                                    { "date": "2023-05-02", "contributionCount": 1 }
                                ] }
                            ]
                        }
                    }
                }
            }
        }"#;

        let response: GraphQLResponse<CalendarData> = serde_json::from_str(raw).unwrap();
        let calendar = response
            .data
            .unwrap()
            .user
            .unwrap()
            .contributions_collection
            .contribution_calendar;
        assert_eq!(calendar.total_contributions, 3);
        assert_eq!(calendar.weeks[0].contribution_days.len(), 2);
        assert_eq!(
            calendar.weeks[0].contribution_days[0].date,
            NaiveDate::from_ymd_opt(2023, 5, 1).unwrap()
        );
    }

    #[test]
    fn not_found_error_type_deserializes() {
        let raw = r#"{
            "data": { "user": null },
            "errors": [ { "type": "NOT_FOUND", "message": "Could not resolve to a User" } ]
        }"#;

        let response: GraphQLResponse<YearsData> = serde_json::from_str(raw).unwrap();
        let errors = response.errors.unwrap();
        assert_eq!(errors[0].error_type.as_deref(), Some("NOT_FOUND"));
    }
}
