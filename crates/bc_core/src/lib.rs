pub mod cursor;
pub mod dialog;
pub mod enigma;
pub mod record;

pub use cursor::SaveCursor;
pub use dialog::{
    ChoiceInput, EditorConfig, IntInput, MultiEditor, Prompt, Selection, SingleEditor,
    StringEditor, StringInput, YesNoInput,
};
pub use enigma::{Enigma, EnigmaError, MAX_STAGES, STAGE_ID_BASE, Stage};
pub use record::BinaryRecord;
