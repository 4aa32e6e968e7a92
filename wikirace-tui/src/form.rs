use wikirace_core::FormFields;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Start,
    End,
    Algorithm,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Start, Field::End, Field::Algorithm];

    pub fn title(&self) -> &'static str {
        match self {
            Field::Start => "Start",
            Field::End => "End",
            Field::Algorithm => "Algorithm",
        }
    }

    pub fn value<'a>(&self, fields: &'a FormFields) -> &'a str {
        match self {
            Field::Start => &fields.start,
            Field::End => &fields.end,
            Field::Algorithm => &fields.algorithm,
        }
    }

    fn value_mut<'a>(&self, fields: &'a mut FormFields) -> &'a mut String {
        match self {
            Field::Start => &mut fields.start,
            Field::End => &mut fields.end,
            Field::Algorithm => &mut fields.algorithm,
        }
    }

    fn next(&self) -> Field {
        match self {
            Field::Start => Field::End,
            Field::End => Field::Algorithm,
            Field::Algorithm => Field::Start,
        }
    }

    fn previous(&self) -> Field {
        match self {
            Field::Start => Field::Algorithm,
            Field::End => Field::Start,
            Field::Algorithm => Field::End,
        }
    }
}

/// Focused field plus a cursor counted in characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldCursor {
    field: Field,
    position: usize,
}

impl FieldCursor {
    pub fn field(&self) -> Field {
        self.field
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn next_field(&mut self, fields: &FormFields) {
        self.field = self.field.next();
        self.end(fields);
    }

    pub fn previous_field(&mut self, fields: &FormFields) {
        self.field = self.field.previous();
        self.end(fields);
    }

    pub fn insert(&mut self, fields: &mut FormFields, c: char) {
        let value = self.field.value_mut(fields);
        let at = byte_index(value, self.position);
        value.insert(at, c);
        self.position += 1;
    }

    pub fn backspace(&mut self, fields: &mut FormFields) {
        if self.position == 0 {
            return;
        }
        let value = self.field.value_mut(fields);
        let at = byte_index(value, self.position - 1);
        value.remove(at);
        self.position -= 1;
    }

    pub fn left(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    pub fn right(&mut self, fields: &FormFields) {
        let len = self.field.value(fields).chars().count();
        if self.position < len {
            self.position += 1;
        }
    }

    pub fn home(&mut self) {
        self.position = 0;
    }

    pub fn end(&mut self, fields: &FormFields) {
        self.position = self.field.value(fields).chars().count();
    }
}

fn byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}
