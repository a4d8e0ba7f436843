use std::fmt::Write;
use std::io::{stdout, IsTerminal};
use std::time::{Duration, Instant};

use crossterm::cursor::{MoveToColumn, MoveToPreviousLine};
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};

/// 终端宽度小于此值时不绘制
const MIN_WIDTH: usize = 40;
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

/// 单个文件的下载进度条，total 为 None 时只显示已下载大小和速度
pub struct ProgressBar {
    label: String,
    total_len: Option<u64>,
    downloaded_len: u64,
    bar_buf: String,
    buf: String,
    start_instant: Instant,
    last_draw: Option<Instant>,
    bar_width: usize,
}

impl ProgressBar {
    pub fn new(label: impl Into<String>, total_len: Option<u64>, max_width: usize) -> Self {
        let bar_width = Self::terminal_width(stdout().is_terminal(), max_width);

        Self::with_width(label, total_len, bar_width)
    }

    /// stdout 不是终端时宽度为 0，即不绘制
    fn terminal_width(stdout_is_terminal: bool, max_width: usize) -> usize {
        if !stdout_is_terminal {
            return 0;
        }

        crossterm::terminal::size().ok()
            .map(|(cols, _rows)| usize::from(cols))
            .unwrap_or(0).min(max_width)
    }

    fn with_width(label: impl Into<String>, total_len: Option<u64>, bar_width: usize) -> Self {
        Self {
            label: label.into(),
            total_len: total_len.filter(|len| *len > 0),
            downloaded_len: 0,
            buf: String::new(),
            bar_buf: String::new(),
            start_instant: Instant::now(),
            last_draw: None,
            bar_width,
        }
    }

    pub fn downloaded_len(&self) -> u64 {
        self.downloaded_len
    }

    /// 增加已下载长度，按间隔重绘
    pub fn inc(&mut self, len: u64) {
        self.downloaded_len += len;

        let due = self.last_draw.map_or(true, |at| at.elapsed() >= REDRAW_INTERVAL);
        if due {
            self.print();
        }
    }

    /// 最后一次重绘并换行
    pub fn finish(&mut self) {
        if self.is_visible() {
            self.print();
            println!();
        }
    }

    fn is_visible(&self) -> bool {
        self.bar_width >= MIN_WIDTH
    }

    fn speed(&self) -> u64 {
        let secs = self.start_instant.elapsed().as_secs_f64();
        if secs > 0.0 {
            (self.downloaded_len as f64 / secs) as u64
        } else {
            0
        }
    }

    fn render(&mut self) -> Result<&str, std::fmt::Error> {
        let speed = self.speed();
        let (downloaded_len_size, downloaded_len_unit) = Self::byte_unit(self.downloaded_len);
        let (speed_size, speed_unit) = Self::byte_unit(speed);
        let duration = self.start_instant.elapsed();

        self.bar_buf.clear();
        self.buf.clear();

        let progress = self.total_len.map(|total_len| {
            (self.downloaded_len.min(total_len) * 100 / total_len) as usize
        });

        match (progress, self.total_len) {
            (Some(progress), Some(total_len)) => {
                let (total_len_size, total_len_unit) = Self::byte_unit(total_len);
                write!(self.bar_buf, "{} - {speed_size:.2} {speed_unit}/s - {progress} % - elapsed: {duration:.2?} ", self.label)?;
                write!(self.buf, "{downloaded_len_size:.2} {downloaded_len_unit} / {total_len_size:.2} {total_len_unit}")?;
            }
            _ => {
                write!(self.bar_buf, "{} - {speed_size:.2} {speed_unit}/s - elapsed: {duration:.2?} ", self.label)?;
                write!(self.buf, "{downloaded_len_size:.2} {downloaded_len_unit}")?;
            }
        }

        let padding = self.bar_width.saturating_sub(self.bar_buf.chars().count() + self.buf.len());
        self.bar_buf.extend(std::iter::repeat(' ').take(padding));
        writeln!(self.bar_buf, "{}", self.buf)?;

        let bar_p_width = self.bar_width.saturating_sub(2);
        self.bar_buf.push('[');
        match progress {
            Some(progress) => {
                let progress_width = progress * bar_p_width / 100;
                self.bar_buf.extend(std::iter::repeat('█').take(progress_width));
                self.bar_buf.extend(std::iter::repeat(' ').take(bar_p_width - progress_width));
            }
            // 总长度未知，画一个来回移动的滑块
            None => {
                let block = 8.min(bar_p_width);
                let track = bar_p_width - block;
                let step = (duration.as_millis() / REDRAW_INTERVAL.as_millis()) as usize;
                let offset = if track == 0 {
                    0
                } else {
                    let pos = step % (track * 2);
                    if pos > track { track * 2 - pos } else { pos }
                };
                self.bar_buf.extend(std::iter::repeat(' ').take(offset));
                self.bar_buf.extend(std::iter::repeat('█').take(block));
                self.bar_buf.extend(std::iter::repeat(' ').take(track - offset));
            }
        }
        self.bar_buf.push(']');

        Ok(&self.bar_buf)
    }

    fn print(&mut self) {
        if !self.is_visible() {
            return;
        }

        // 第一次绘制前先占出两行
        if self.last_draw.is_none() {
            println!();
        }
        self.last_draw = Some(Instant::now());

        let Ok(update_value) = self.render() else {
            return;
        };
        let _ = execute!(
            stdout(),
            Clear(ClearType::CurrentLine),
            MoveToPreviousLine(1),
            Clear(ClearType::CurrentLine),
            MoveToColumn(0),
            crossterm::style::Print(update_value),
        );
    }

    fn byte_unit(bytes_count: u64) -> (f32, &'static str) {
        const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

        let mut i = 0;
        let mut bytes_count = bytes_count as f32;
        while bytes_count >= 1024.0 && i < UNITS.len() - 1 {
            i += 1;
            bytes_count /= 1024.0;
        }
        (bytes_count, UNITS[i])
    }
}
