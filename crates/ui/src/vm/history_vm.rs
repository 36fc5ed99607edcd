use services::CompletionListItem;

use super::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionCardVm {
    pub id: i64,
    pub participant: String,
    pub team: String,
    pub score_str: String,
    pub completed_at_str: String,
}

#[must_use]
pub fn map_completion_cards(items: &[CompletionListItem]) -> Vec<CompletionCardVm> {
    items
        .iter()
        .map(|item| CompletionCardVm {
            id: item.id,
            participant: item.participant.clone(),
            team: item.team.clone(),
            score_str: format!("{} / {}", item.score, item.total),
            completed_at_str: format_datetime(item.completed_at),
        })
        .collect()
}
