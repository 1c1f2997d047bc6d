pub mod sample_mute_editor;
pub mod wav_recording_reader;
pub mod wav_recording_writer;
