/// Универсальные утилиты для работы со списками (поиск, сортировка)
use leptos::prelude::*;
use std::cmp::Ordering;

/// Trait для типов данных, поддерживающих поиск
pub trait Searchable {
    /// `needle` is already trimmed and lowercased
    fn matches_filter(&self, needle: &str) -> bool;
}

/// Trait для типов данных, поддерживающих сортировку
pub trait Sortable {
    /// Сравнивает два объекта по указанному полю
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering;
}

/// Case-insensitive substring test against a lowercased needle
pub fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

pub fn compare_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// `None` sorts after every value
pub fn compare_opt_f64(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Сортирует список по указанному полю (stable: equal rows keep backend order)
pub fn sort_list<T: Sortable>(items: &mut [T], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = a.compare_by_field(b, field);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
}

/// Фильтрует список по поисковому запросу
pub fn filter_list<T: Searchable>(items: Vec<T>, filter: &str) -> Vec<T> {
    let needle = filter.trim().to_lowercase();
    if needle.is_empty() {
        return items;
    }

    items
        .into_iter()
        .filter(|item| item.matches_filter(&needle))
        .collect()
}

/// Подсветка совпадений в тексте (case-insensitive)
pub fn highlight_matches(text: &str, filter: &str) -> AnyView {
    let needle = filter.trim().to_lowercase();
    if needle.is_empty() {
        return view! { <span>{text.to_string()}</span> }.into_any();
    }

    let parts = split_matches(text, &needle)
        .into_iter()
        .map(|(part, is_match)| {
            if is_match {
                view! { <mark class="search-highlight">{part}</mark> }.into_any()
            } else {
                view! { <span>{part}</span> }.into_any()
            }
        })
        .collect::<Vec<_>>();

    view! { <>{parts}</> }.into_any()
}

/// Splits `text` into `(fragment, is_match)` runs.
///
/// Matching is done char by char on lowercase forms so byte offsets never land
/// inside a multi-byte character ("Mecánico", "Peñón").
fn split_matches(text: &str, needle_lower: &str) -> Vec<(String, bool)> {
    let chars: Vec<char> = text.chars().collect();
    let lowered: Vec<String> = chars.iter().map(|c| c.to_lowercase().collect()).collect();
    let needle: Vec<char> = needle_lower.chars().collect();

    let mut parts = Vec::new();
    let mut plain = String::new();
    let mut i = 0;
    while i < chars.len() {
        let matched = match_len_at(&lowered, i, &needle);
        if let Some(len) = matched {
            if !plain.is_empty() {
                parts.push((std::mem::take(&mut plain), false));
            }
            parts.push((chars[i..i + len].iter().collect(), true));
            i += len;
        } else {
            plain.push(chars[i]);
            i += 1;
        }
    }
    if !plain.is_empty() {
        parts.push((plain, false));
    }
    parts
}

fn match_len_at(lowered: &[String], start: usize, needle: &[char]) -> Option<usize> {
    let mut consumed = 0;
    let mut count = 0;
    for piece in lowered.iter().skip(start) {
        if consumed >= needle.len() {
            break;
        }
        for c in piece.chars() {
            if needle.get(consumed) != Some(&c) {
                return None;
            }
            consumed += 1;
        }
        count += 1;
    }
    (consumed == needle.len() && count > 0).then_some(count)
}

/// Получить индикатор сортировки для заголовка
pub fn get_sort_indicator(current: Option<(&str, bool)>, field: &str) -> &'static str {
    match current {
        Some((current_field, ascending)) if current_field == field => {
            if ascending {
                " ▲"
            } else {
                " ▼"
            }
        }
        _ => " ⇅",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u32,
        name: &'static str,
    }

    impl Searchable for Row {
        fn matches_filter(&self, needle: &str) -> bool {
            contains_ci(self.name, needle)
        }
    }

    impl Sortable for Row {
        fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
            match field {
                "name" => compare_ci(self.name, other.name),
                _ => self.id.cmp(&other.id),
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: 2, name: "Norte" },
            Row { id: 1, name: "centro" },
            Row { id: 3, name: "Norte-Express" },
        ]
    }

    #[test]
    fn test_filter_list_is_case_insensitive() {
        let found = filter_list(rows(), "  NORTE ");
        assert_eq!(found.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(filter_list(rows(), "").len(), 3);
    }

    #[test]
    fn test_sort_list_both_directions() {
        let mut items = rows();
        sort_list(&mut items, "name", true);
        assert_eq!(items[0].name, "centro");

        sort_list(&mut items, "id", false);
        assert_eq!(items.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn test_split_matches_multibyte() {
        let parts = split_matches("Taller Peñón", "ñó");
        assert_eq!(
            parts,
            vec![
                ("Taller Pe".to_string(), false),
                ("ñó".to_string(), true),
                ("n".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_split_matches_repeated() {
        let parts = split_matches("AB-12 ab-12", "ab-12");
        assert_eq!(
            parts,
            vec![
                ("AB-12".to_string(), true),
                (" ".to_string(), false),
                ("ab-12".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_sort_indicator() {
        assert_eq!(get_sort_indicator(Some(("id", true)), "id"), " ▲");
        assert_eq!(get_sort_indicator(Some(("id", false)), "id"), " ▼");
        assert_eq!(get_sort_indicator(Some(("id", true)), "name"), " ⇅");
        assert_eq!(get_sort_indicator(None, "name"), " ⇅");
    }
}
