//! Interactive editing primitives for save fields.
//!
//! Every primitive follows the same contract: unparsable input re-prompts,
//! out-of-range numeric input clamps, and a quit sentinel (`q`) keeps the
//! prior value. Nothing in here returns an error to the caller.

/// Console surface the editor talks through. The CLI backs this with
/// stdin/stdout; tests script it.
pub trait Prompt {
    fn read_line(&mut self, prompt: &str) -> String;
    fn say(&mut self, line: &str);
}

/// Immutable editor configuration, injected at construction.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Power-user toggle: ignore per-field maxes and bound everything by
    /// the representable limit instead.
    pub disable_maxes: bool,
    /// The single token that counts as an affirmative answer.
    pub yes_token: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            disable_maxes: false,
            yes_token: "y".to_string(),
        }
    }
}

const QUIT: &str = "q";
const SIGNED_LIMIT: i64 = i32::MAX as i64;
const UNSIGNED_LIMIT: i64 = u32::MAX as i64;

/// Range-clamped integer prompt.
#[derive(Debug, Clone)]
pub struct IntInput {
    max: i64,
    min: i64,
    default: Option<i64>,
}

impl IntInput {
    pub fn new(config: &EditorConfig, max: Option<i64>, min: i64, default: Option<i64>) -> Self {
        Self {
            max: Self::effective_max(config, max, true),
            min,
            default,
        }
    }

    /// Resolve a caller-supplied max against the representable limit.
    /// With `disable_maxes` set, or no max given, the limit wins outright.
    pub fn effective_max(config: &EditorConfig, max: Option<i64>, signed: bool) -> i64 {
        let limit = if signed { SIGNED_LIMIT } else { UNSIGNED_LIMIT };
        match max {
            Some(max) if !config.disable_maxes => max.min(limit),
            _ => limit,
        }
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    fn clamp(&self, value: i64) -> i64 {
        value.min(self.max).max(self.min)
    }

    /// One prompt round. Returns the accepted value (clamped, or the
    /// default on empty input) plus the raw line for sentinel checks.
    pub fn get_input(&self, prompt: &mut dyn Prompt, dialog: &str) -> (Option<i64>, String) {
        let line = prompt.read_line(dialog);
        if line.is_empty() {
            if let Some(default) = self.default {
                return (Some(default), line);
            }
        }
        match line.trim().parse::<i64>() {
            Ok(value) => (Some(self.clamp(value)), line),
            Err(_) => (None, line),
        }
    }

    /// Re-prompt until input parses; the quit sentinel aborts with `None`.
    pub fn get_input_while(&self, prompt: &mut dyn Prompt, dialog: &str) -> Option<i64> {
        loop {
            let (value, line) = self.get_input(prompt, dialog);
            if let Some(value) = value {
                return Some(value);
            }
            if line == QUIT {
                return None;
            }
        }
    }
}

/// Outcome of a multi-choice menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Zero-based indices into the item list.
    pub indices: Vec<usize>,
    /// True when the "all at once" row was chosen: apply one batch edit to
    /// every item rather than prompting per item.
    pub all_at_once: bool,
}

impl Selection {
    fn none() -> Self {
        Self {
            indices: Vec::new(),
            all_at_once: false,
        }
    }

    fn one(index: usize) -> Self {
        Self {
            indices: vec![index],
            all_at_once: false,
        }
    }
}

/// Enumerated 1-based menu over parallel label/annotation lists.
pub struct ChoiceInput {
    labels: Vec<String>,
    annotations: Vec<String>,
    title: String,
    single_choice: bool,
}

impl ChoiceInput {
    pub fn new(labels: Vec<String>, title: impl Into<String>, single_choice: bool) -> Self {
        Self {
            labels,
            annotations: Vec::new(),
            title: title.into(),
            single_choice,
        }
    }

    pub fn with_annotations(mut self, annotations: Vec<String>) -> Self {
        self.annotations = annotations;
        self
    }

    fn render_menu(&self, prompt: &mut dyn Prompt, all_row: bool) {
        prompt.say(&self.title);
        for (i, label) in self.labels.iter().enumerate() {
            match self.annotations.get(i) {
                Some(annotation) => prompt.say(&format!(" {}. {label}: {annotation}", i + 1)),
                None => prompt.say(&format!(" {}. {label}", i + 1)),
            }
        }
        if all_row {
            prompt.say(&format!(" {}. all at once", self.labels.len() + 1));
        }
    }

    /// Raw 1-based picks for one menu round, plus the all-at-once flag.
    fn round(&self, prompt: &mut dyn Prompt) -> (Vec<usize>, bool) {
        let count = self.labels.len();
        let all_row = !self.single_choice;
        self.render_menu(prompt, all_row);
        let upper = if all_row { count + 1 } else { count };
        let line = prompt.read_line(&format!("select 1-{upper}: "));
        let mut picks: Vec<usize> = line
            .split_whitespace()
            .filter_map(|token| token.parse::<usize>().ok())
            .collect();
        if all_row && picks.contains(&(count + 1)) {
            return ((1..=count).collect(), true);
        }
        if self.single_choice && picks.len() > 1 {
            picks.truncate(1);
        }
        (picks, false)
    }

    fn to_selection(&self, picks: Vec<usize>, all_at_once: bool) -> Selection {
        let count = self.labels.len();
        Selection {
            indices: picks
                .into_iter()
                .filter(|&pick| pick >= 1 && pick <= count)
                .map(|pick| pick - 1)
                .collect(),
            all_at_once,
        }
    }

    /// One menu round. Tokens are space-separated 1-based indices;
    /// anything unparsable or out of range is dropped. Choosing the
    /// one-past-the-last "all" row selects every item as a single batch.
    pub fn get_selection(&self, prompt: &mut dyn Prompt) -> Selection {
        match self.labels.len() {
            0 => Selection::none(),
            1 => Selection::one(0),
            _ => {
                let (picks, all_at_once) = self.round(prompt);
                self.to_selection(picks, all_at_once)
            }
        }
    }

    /// Menu loop: empty input re-prompts, a lone `0` cancels with an empty
    /// selection (distinct from "all").
    pub fn get_selection_while(&self, prompt: &mut dyn Prompt) -> Selection {
        if self.labels.len() <= 1 {
            return self.get_selection(prompt);
        }
        loop {
            let (picks, all_at_once) = self.round(prompt);
            if picks == [0] {
                return Selection::none();
            }
            let selection = self.to_selection(picks, all_at_once);
            if selection.all_at_once || !selection.indices.is_empty() {
                return selection;
            }
        }
    }

    /// Single-selection loop in the IntInput style: clamps to the menu
    /// range, `q` aborts with no selection.
    pub fn single_choice(&self, prompt: &mut dyn Prompt, config: &EditorConfig) -> Option<usize> {
        let count = self.labels.len();
        match count {
            0 => return None,
            1 => return Some(0),
            _ => {}
        }
        self.render_menu(prompt, false);
        let input = IntInput::new(config, Some(count as i64), 1, None);
        let pick = input.get_input_while(prompt, &format!("select 1-{count}: "))?;
        Some(pick as usize - 1)
    }
}

/// Edits N labeled integer fields sharing a group name, either one at a
/// time or all at once depending on the menu outcome.
pub struct MultiEditor<'a> {
    config: &'a EditorConfig,
    group_name: String,
    labels: Vec<String>,
    values: Vec<i64>,
    max_values: Vec<Option<i64>>,
    signed: bool,
    /// The fields share one budget: the group's values must sum to at most
    /// the shared max.
    cumulative_max: bool,
}

impl<'a> MultiEditor<'a> {
    pub fn new(
        config: &'a EditorConfig,
        group_name: impl Into<String>,
        labels: Vec<String>,
        values: Vec<i64>,
        max_values: Vec<Option<i64>>,
    ) -> Self {
        Self {
            config,
            group_name: group_name.into(),
            labels,
            values,
            max_values,
            signed: true,
            cumulative_max: false,
        }
    }

    pub fn with_uniform_max(
        config: &'a EditorConfig,
        group_name: impl Into<String>,
        labels: Vec<String>,
        values: Vec<i64>,
        max_value: Option<i64>,
    ) -> Self {
        let max_values = vec![max_value; values.len()];
        Self::new(config, group_name, labels, values, max_values)
    }

    pub fn cumulative(mut self, cumulative_max: bool) -> Self {
        self.cumulative_max = cumulative_max;
        self
    }

    pub fn unsigned(mut self) -> Self {
        self.signed = false;
        self
    }

    fn resolved_max(&self, index: usize) -> i64 {
        IntInput::effective_max(
            self.config,
            self.max_values.get(index).copied().flatten(),
            self.signed,
        )
    }

    pub fn edit(mut self, prompt: &mut dyn Prompt) -> Vec<i64> {
        let annotations = self.values.iter().map(i64::to_string).collect();
        let menu = ChoiceInput::new(
            self.labels.clone(),
            format!("edit {}:", self.group_name),
            false,
        )
        .with_annotations(annotations);
        let selection = menu.get_selection_while(prompt);
        if selection.indices.is_empty() {
            return self.values;
        }
        if selection.all_at_once {
            self.edit_all(prompt, &selection.indices);
        } else {
            self.edit_one(prompt, &selection.indices);
        }
        self.values
    }

    /// One prompt for the whole selection. The shared bound is the
    /// smallest selected field's bound; under a cumulative budget it is
    /// further divided by the selection count so the group sum stays
    /// within budget.
    fn edit_all(&mut self, prompt: &mut dyn Prompt, indices: &[usize]) {
        let mut shared_max = i64::MAX;
        for &index in indices {
            shared_max = shared_max.min(self.resolved_max(index));
        }
        if self.cumulative_max {
            shared_max /= indices.len() as i64;
        }
        let input = IntInput::new(self.config, Some(shared_max), 0, None);
        let Some(value) = input.get_input_while(
            prompt,
            &format!("{} for all selected (max {shared_max}): ", self.group_name),
        ) else {
            return;
        };
        for &index in indices {
            let applied = value.min(self.resolved_max(index));
            self.values[index] = applied;
            prompt.say(&format!("{} set to {applied}", self.labels[index]));
        }
    }

    /// Independent prompt per selected field; aborting one field keeps
    /// that field only and moves on.
    fn edit_one(&mut self, prompt: &mut dyn Prompt, indices: &[usize]) {
        for &index in indices {
            let mut max_value = self.resolved_max(index);
            if self.cumulative_max {
                let others: i64 = self.values.iter().sum::<i64>() - self.values[index];
                max_value -= others;
            }
            let input = IntInput::new(self.config, Some(max_value), 0, Some(self.values[index]));
            let dialog = format!(
                "{} (current {}, max {max_value}): ",
                self.labels[index], self.values[index]
            );
            let Some(value) = input.get_input_while(prompt, &dialog) else {
                continue;
            };
            self.values[index] = value;
            prompt.say(&format!("{} set to {value}", self.labels[index]));
        }
    }
}

/// Single integer field: clamp-or-keep.
pub struct SingleEditor<'a> {
    config: &'a EditorConfig,
    label: String,
    value: i64,
    max_value: Option<i64>,
    min_value: i64,
    signed: bool,
}

impl<'a> SingleEditor<'a> {
    pub fn new(
        config: &'a EditorConfig,
        label: impl Into<String>,
        value: i64,
        max_value: Option<i64>,
    ) -> Self {
        Self {
            config,
            label: label.into(),
            value,
            max_value,
            min_value: 0,
            signed: true,
        }
    }

    pub fn min(mut self, min_value: i64) -> Self {
        self.min_value = min_value;
        self
    }

    pub fn unsigned(mut self) -> Self {
        self.signed = false;
        self
    }

    pub fn edit(self, prompt: &mut dyn Prompt) -> i64 {
        let max_value = IntInput::effective_max(self.config, self.max_value, self.signed);
        let input = IntInput {
            max: max_value,
            min: self.min_value,
            default: Some(self.value),
        };
        let dialog = format!(
            "{} (current {}, max {max_value}): ",
            self.label, self.value
        );
        match input.get_input_while(prompt, &dialog) {
            Some(value) => {
                prompt.say(&format!("{} set to {value}", self.label));
                value
            }
            None => self.value,
        }
    }
}

/// Free-form string prompt: empty keeps the default, a lone space is a
/// no-op keystroke that re-prompts.
pub struct StringInput {
    default: String,
}

impl StringInput {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
        }
    }

    pub fn get_input_while(&self, prompt: &mut dyn Prompt, dialog: &str) -> String {
        loop {
            let line = prompt.read_line(dialog);
            if line.is_empty() {
                return self.default.clone();
            }
            if line == " " {
                continue;
            }
            return line;
        }
    }
}

pub struct StringEditor {
    label: String,
    value: String,
}

impl StringEditor {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn edit(self, prompt: &mut dyn Prompt) -> String {
        let dialog = format!("{} (current {}): ", self.label, self.value);
        let value = StringInput::new(self.value.clone()).get_input_while(prompt, &dialog);
        if value != self.value {
            prompt.say(&format!("{} set to {value}", self.label));
        }
        value
    }
}

/// Yes/no question resolved against the configured affirmative token by
/// exact equality; anything else is "no", and empty input takes the
/// default.
pub struct YesNoInput<'a> {
    config: &'a EditorConfig,
    default: bool,
}

impl<'a> YesNoInput<'a> {
    pub fn new(config: &'a EditorConfig, default: bool) -> Self {
        Self { config, default }
    }

    pub fn get_input_while(&self, prompt: &mut dyn Prompt, dialog: &str) -> bool {
        loop {
            let line = prompt.read_line(dialog);
            if line.is_empty() {
                return self.default;
            }
            if line == " " {
                continue;
            }
            return line == self.config.yes_token;
        }
    }

    pub fn get_input_once(&self, prompt: &mut dyn Prompt, dialog: &str) -> bool {
        let line = prompt.read_line(dialog);
        if line.is_empty() {
            return self.default;
        }
        line == self.config.yes_token
    }
}
