// src/monitor/tailer.rs

//! Incremental tailing of a process's active sub-task output.
//!
//! Each poll looks at the sub-tasks that are active right now, picks one to
//! follow, and reads only the lines of its output file that were not seen
//! before. The cursor belongs to an output *file*: moving to another file
//! (new sub-task, or the same sub-task naming a new output) starts again at
//! line 0.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::Result;
use crate::fs::{read_lines_after, FileSystem, PartialLine};
use crate::process::{ProcessSnapshot, ProcessSource, SubTask};

/// Position of a tailer within the process's output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TailCursor {
    /// Sub-task followed on the previous tick.
    pub subtask_id: Option<u64>,
    /// Output file the line count refers to.
    pub file: Option<PathBuf>,
    /// Lines already consumed from `file`.
    pub lines_read: usize,
}

impl TailCursor {
    fn follow(&mut self, subtask: &SubTask) {
        if self.subtask_id != Some(subtask.id) {
            debug!(previous = ?self.subtask_id, next = subtask.id, "following new sub-task");
            self.subtask_id = Some(subtask.id);
        }
    }

    fn point_at(&mut self, path: &Path) {
        if self.file.as_deref() != Some(path) {
            debug!(?path, "tailing new output file; cursor reset");
            self.file = Some(path.to_path_buf());
            self.lines_read = 0;
        }
    }
}

/// Choose which active sub-task to follow.
///
/// Stick with the one followed last tick while it is still active, otherwise
/// move to the most recently listed one.
pub fn select_subtask<'a>(subtasks: &'a [SubTask], previous: Option<u64>) -> Option<&'a SubTask> {
    previous
        .and_then(|id| subtasks.iter().find(|s| s.id == id))
        .or_else(|| subtasks.last())
}

/// One tailing step over an already-enumerated list of active sub-tasks.
///
/// Only newline-terminated lines are returned and counted; a line still
/// being written is picked up by a later tick.
///
/// Returns the new lines and the updated cursor; `cursor` itself is left
/// untouched so callers can decide whether to commit.
pub fn poll_new_lines(
    fs: &dyn FileSystem,
    subtasks: &[SubTask],
    cursor: &TailCursor,
) -> Result<(Vec<String>, TailCursor)> {
    let mut next = cursor.clone();

    let Some(subtask) = select_subtask(subtasks, cursor.subtask_id) else {
        return Ok((Vec::new(), next));
    };
    next.follow(subtask);

    let Some(path) = subtask.output_path() else {
        return Ok((Vec::new(), next));
    };
    next.point_at(&path);

    let lines = read_available(fs, &path, next.lines_read, PartialLine::Hold)?;
    next.lines_read += lines.len();
    Ok((lines, next))
}

/// Read past `skip`, treating a file that does not exist yet as empty.
fn read_available(
    fs: &dyn FileSystem,
    path: &Path,
    skip: usize,
    partial: PartialLine,
) -> Result<Vec<String>> {
    if !fs.is_file(path) {
        return Ok(Vec::new());
    }
    Ok(read_lines_after(fs, path, skip, partial)?)
}

/// Tailer for one watched process.
///
/// Owned by exactly one watch session; dropping it discards the cursor.
#[derive(Debug)]
pub struct LogTailer {
    fs: Arc<dyn FileSystem>,
    cursor: TailCursor,
    finished: bool,
}

impl LogTailer {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            cursor: TailCursor::default(),
            finished: false,
        }
    }

    pub fn cursor(&self) -> &TailCursor {
        &self.cursor
    }

    /// True once the process was seen sealed and the last file drained.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Pull whatever is new for the process described by `snapshot`.
    ///
    /// While the process is open this enumerates its active sub-tasks
    /// through `source`. The first poll that sees it sealed drains the file
    /// being tailed one last time; every poll after that returns nothing.
    pub fn poll(
        &mut self,
        source: &dyn ProcessSource,
        snapshot: &ProcessSnapshot,
    ) -> Result<Vec<String>> {
        if self.finished {
            return Ok(Vec::new());
        }

        if snapshot.sealed {
            let lines = self.drain()?;
            self.finished = true;
            info!(pk = snapshot.pk, drained = lines.len(), "process sealed; tailing stopped");
            return Ok(lines);
        }

        let subtasks = source.active_subtasks(snapshot.pk)?;
        let (lines, cursor) = poll_new_lines(self.fs.as_ref(), &subtasks, &self.cursor)?;
        self.cursor = cursor;

        if !lines.is_empty() {
            debug!(
                pk = snapshot.pk,
                subtask = ?self.cursor.subtask_id,
                new_lines = lines.len(),
                "tailed new output"
            );
        }
        Ok(lines)
    }

    fn drain(&mut self) -> Result<Vec<String>> {
        let Some(path) = self.cursor.file.clone() else {
            return Ok(Vec::new());
        };
        // The writer is done, so an unterminated last line is complete.
        let lines = read_available(
            self.fs.as_ref(),
            &path,
            self.cursor.lines_read,
            PartialLine::Include,
        )?;
        self.cursor.lines_read += lines.len();
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn sub(id: u64, dir: &str) -> SubTask {
        SubTask {
            id,
            remote_workdir: Some(PathBuf::from(dir)),
            output_filename: Some("aiida.out".to_string()),
        }
    }

    #[test]
    fn select_prefers_previous_while_active() {
        let subs = vec![sub(1, "/s/1"), sub(2, "/s/2")];
        assert_eq!(select_subtask(&subs, Some(1)).map(|s| s.id), Some(1));
        assert_eq!(select_subtask(&subs, Some(7)).map(|s| s.id), Some(2));
        assert_eq!(select_subtask(&subs, None).map(|s| s.id), Some(2));
        assert!(select_subtask(&[], Some(1)).is_none());
    }

    #[test]
    fn grows_incrementally() {
        let fs = MockFileSystem::new();
        let subs = vec![sub(1, "/s/1")];
        fs.add_file("/s/1/aiida.out", "a\nb\n");

        let (lines, cursor) = poll_new_lines(&fs, &subs, &TailCursor::default()).unwrap();
        assert_eq!(lines, vec!["a", "b"]);
        assert_eq!(cursor.lines_read, 2);

        let (lines, cursor) = poll_new_lines(&fs, &subs, &cursor).unwrap();
        assert!(lines.is_empty());

        fs.append_file("/s/1/aiida.out", "c\n");
        let (lines, cursor) = poll_new_lines(&fs, &subs, &cursor).unwrap();
        assert_eq!(lines, vec!["c"]);
        assert_eq!(cursor.lines_read, 3);
    }

    #[test]
    fn missing_file_yields_nothing_without_error() {
        let fs = MockFileSystem::new();
        let subs = vec![sub(1, "/s/1")];

        let (lines, cursor) = poll_new_lines(&fs, &subs, &TailCursor::default()).unwrap();
        assert!(lines.is_empty());
        assert_eq!(cursor.subtask_id, Some(1));
        assert_eq!(cursor.lines_read, 0);
    }

    #[test]
    fn subtask_without_output_name_yields_nothing() {
        let fs = MockFileSystem::new();
        let subs = vec![SubTask {
            id: 3,
            remote_workdir: None,
            output_filename: Some("aiida.out".to_string()),
        }];
        let (lines, cursor) = poll_new_lines(&fs, &subs, &TailCursor::default()).unwrap();
        assert!(lines.is_empty());
        assert_eq!(cursor.file, None);
    }

    #[test]
    fn switching_subtask_resets_cursor() {
        let fs = MockFileSystem::new();
        fs.add_file("/s/1/aiida.out", "1a\n1b\n1c\n");
        fs.add_file("/s/2/aiida.out", "2a\n2b\n");

        let (_, cursor) = poll_new_lines(&fs, &[sub(1, "/s/1")], &TailCursor::default()).unwrap();
        assert_eq!(cursor.lines_read, 3);

        // Sub-task 1 finished, sub-task 2 took over.
        let (lines, cursor) = poll_new_lines(&fs, &[sub(2, "/s/2")], &cursor).unwrap();
        assert_eq!(lines, vec!["2a", "2b"]);
        assert_eq!(cursor.subtask_id, Some(2));
        assert_eq!(cursor.lines_read, 2);
    }

    #[test]
    fn same_subtask_new_output_path_resets_cursor() {
        let fs = MockFileSystem::new();
        fs.add_file("/s/1/aiida.out", "x\ny\n");
        fs.add_file("/s/1/other.out", "z\n");

        let (_, cursor) = poll_new_lines(&fs, &[sub(1, "/s/1")], &TailCursor::default()).unwrap();
        let renamed = SubTask {
            output_filename: Some("other.out".to_string()),
            ..sub(1, "/s/1")
        };
        let (lines, cursor) = poll_new_lines(&fs, &[renamed], &cursor).unwrap();
        assert_eq!(lines, vec!["z"]);
        assert_eq!(cursor.lines_read, 1);
    }

    #[test]
    fn line_split_across_ticks_is_emitted_whole() {
        let fs = MockFileSystem::new();
        let subs = vec![sub(1, "/s/1")];
        fs.add_file("/s/1/aiida.out", "a\npar");

        let (lines, cursor) = poll_new_lines(&fs, &subs, &TailCursor::default()).unwrap();
        assert_eq!(lines, vec!["a"]);
        assert_eq!(cursor.lines_read, 1);

        fs.append_file("/s/1/aiida.out", "tial\nb\n");
        let (lines, cursor) = poll_new_lines(&fs, &subs, &cursor).unwrap();
        assert_eq!(lines, vec!["partial", "b"]);
        assert_eq!(cursor.lines_read, 3);
    }

    #[test]
    fn empty_enumeration_keeps_cursor() {
        let fs = MockFileSystem::new();
        fs.add_file("/s/1/aiida.out", "x\n");
        let (_, cursor) = poll_new_lines(&fs, &[sub(1, "/s/1")], &TailCursor::default()).unwrap();

        let (lines, after) = poll_new_lines(&fs, &[], &cursor).unwrap();
        assert!(lines.is_empty());
        assert_eq!(after, cursor);
    }
}
