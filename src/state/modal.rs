/// Add/edit form state machine
///
/// Hidden → Visible(Add | Edit) → saving → Hidden. Submitting turns the
/// form into a `Submission` that the caller applies to the link collection;
/// the form is then frozen until the save completes and the modal is hidden.

use super::link::{Category, Link, LinkFields};

pub const ADD_HEADING: &str = "Add New Link";
pub const EDIT_HEADING: &str = "Edit Link";

/// Form text inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Url,
    Icon,
    Description,
}

/// Current values of the form inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkForm {
    pub title: String,
    pub url: String,
    pub icon: String,
    pub description: String,
    pub category: String,
}

impl Default for LinkForm {
    /// A reset form: empty inputs, category select on its first option
    fn default() -> Self {
        Self {
            title: String::new(),
            url: String::new(),
            icon: String::new(),
            description: String::new(),
            category: Category::ALL[0].key().to_string(),
        }
    }
}

impl LinkForm {
    fn from_link(link: &Link) -> Self {
        let fields = link.fields();
        Self {
            title: fields.title,
            url: fields.url,
            icon: fields.icon,
            description: fields.description,
            category: fields.category,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Title => self.title = value,
            Field::Url => self.url = value,
            Field::Icon => self.icon = value,
            Field::Description => self.description = value,
        }
    }

    /// The category select's current option, if the value is a known category
    pub fn selected_category(&self) -> Option<Category> {
        Category::from_key(&self.category)
    }

    /// Names of required inputs that are blank
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.url.trim().is_empty() {
            missing.push("URL");
        }
        missing
    }

    fn fields(&self) -> LinkFields {
        LinkFields {
            title: self.title.clone(),
            url: self.url.clone(),
            icon: self.icon.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalMode {
    Add,
    /// Editing the link with this id
    Edit(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    Hidden,
    Visible {
        mode: ModalMode,
        form: LinkForm,
        /// Shown under the form after a rejected submit
        hint: Option<String>,
        /// Submitted and waiting for the save; inputs and submit are inert
        saving: bool,
    },
}

/// What a successful submit asks the caller to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(LinkFields),
    Update { id: String, fields: LinkFields },
}

impl Modal {
    pub fn show_add(&mut self) {
        *self = Modal::Visible {
            mode: ModalMode::Add,
            form: LinkForm::default(),
            hint: None,
            saving: false,
        };
    }

    pub fn show_edit(&mut self, link: &Link) {
        *self = Modal::Visible {
            mode: ModalMode::Edit(link.id.clone()),
            form: LinkForm::from_link(link),
            hint: None,
            saving: false,
        };
    }

    pub fn hide(&mut self) {
        *self = Modal::Hidden;
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Modal::Visible { .. })
    }

    pub fn heading(&self) -> Option<&'static str> {
        match self {
            Modal::Hidden => None,
            Modal::Visible { mode: ModalMode::Add, .. } => Some(ADD_HEADING),
            Modal::Visible { mode: ModalMode::Edit(_), .. } => Some(EDIT_HEADING),
        }
    }

    pub fn is_saving(&self) -> bool {
        matches!(self, Modal::Visible { saving: true, .. })
    }

    /// The editable form, unless hidden or already submitted
    pub fn form_mut(&mut self) -> Option<&mut LinkForm> {
        match self {
            Modal::Visible { form, saving: false, .. } => Some(form),
            _ => None,
        }
    }

    /// Read the form and decide between create and update.
    ///
    /// The modal stays visible but frozen; it is hidden once the change is
    /// persisted. Returns None when hidden, already saving, or when a
    /// required input is blank.
    pub fn submit(&mut self) -> Option<Submission> {
        let Modal::Visible { mode, form, hint, saving } = self else {
            return None;
        };
        if *saving {
            return None;
        }

        let missing = form.missing();
        if !missing.is_empty() {
            *hint = Some(format!("Please fill in: {}", missing.join(", ")));
            return None;
        }
        *hint = None;
        *saving = true;

        let fields = form.fields();
        Some(match mode {
            ModalMode::Add => Submission::Create(fields),
            ModalMode::Edit(id) => Submission::Update {
                id: id.clone(),
                fields,
            },
        })
    }
}
