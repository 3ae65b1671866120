diesel::table! {
    notes (id) {
        id -> Varchar,
        title -> Varchar,
        audio_path -> Varchar,
        transcript -> Text,
        summary -> Text,
        is_edited -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
