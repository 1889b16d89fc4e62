use std::process::{Command as ProcessCommand, ExitStatus};

use anyhow::{Context, Result};

#[cfg(unix)]
use anyhow::anyhow;
#[cfg(unix)]
use std::os::unix::process::CommandExt;

/// Signals the session loop must survive while a player owns the terminal.
#[cfg(unix)]
const HELD_SIGNALS: [libc::c_int; 2] = [libc::SIGINT, libc::SIGTTOU];

/// Terminal hold for one playback queue. While it lives, Ctrl-C and
/// background-write stops are ignored here, and every player started through
/// [`PlayerTerminal::run`] gets the terminal as its own process group.
/// Dropping it restores the saved signal dispositions.
pub(crate) struct PlayerTerminal {
    #[cfg(unix)]
    saved: Vec<(libc::c_int, libc::sigaction)>,
    /// Our foreground process group, when stdin is a terminal.
    #[cfg(unix)]
    owner_pgrp: Option<libc::pid_t>,
}

#[cfg(unix)]
impl PlayerTerminal {
    pub(crate) fn acquire() -> Result<Self> {
        let pgrp = unsafe { libc::tcgetpgrp(libc::STDIN_FILENO) };
        let mut hold = Self {
            saved: Vec::with_capacity(HELD_SIGNALS.len()),
            owner_pgrp: (pgrp != -1).then_some(pgrp),
        };
        for signum in HELD_SIGNALS {
            let previous = unsafe {
                let mut ignore: libc::sigaction = std::mem::zeroed();
                ignore.sa_sigaction = libc::SIG_IGN;
                libc::sigemptyset(&mut ignore.sa_mask);
                let mut previous: libc::sigaction = std::mem::zeroed();
                if libc::sigaction(signum, &ignore, &mut previous) != 0 {
                    // `hold` drops here and restores whatever was already saved.
                    return Err(anyhow!("failed to ignore signal {signum}"));
                }
                previous
            };
            hold.saved.push((signum, previous));
        }
        Ok(hold)
    }

    pub(crate) fn run(&self, mut cmd: ProcessCommand) -> Result<ExitStatus> {
        let Some(owner_pgrp) = self.owner_pgrp else {
            return cmd.status().context("failed to launch player");
        };

        unsafe {
            cmd.pre_exec(|| {
                for signum in [libc::SIGINT, libc::SIGQUIT, libc::SIGTSTP, libc::SIGTTOU] {
                    libc::signal(signum, libc::SIG_DFL);
                }
                if libc::setpgid(0, 0) != 0 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }

        let mut child = cmd.spawn().context("failed to spawn player")?;
        let child_pgrp = child.id() as libc::pid_t;
        let handed_over = unsafe { libc::tcsetpgrp(libc::STDIN_FILENO, child_pgrp) == 0 };
        let status = child.wait().context("failed waiting on player");
        if handed_over {
            unsafe {
                libc::tcsetpgrp(libc::STDIN_FILENO, owner_pgrp);
            }
        }
        status
    }
}

#[cfg(unix)]
impl Drop for PlayerTerminal {
    fn drop(&mut self) {
        for (signum, previous) in self.saved.drain(..).rev() {
            unsafe {
                libc::sigaction(signum, &previous, std::ptr::null_mut());
            }
        }
    }
}

#[cfg(not(unix))]
impl PlayerTerminal {
    pub(crate) fn acquire() -> Result<Self> {
        Ok(Self {})
    }

    pub(crate) fn run(&self, mut cmd: ProcessCommand) -> Result<ExitStatus> {
        cmd.status().context("failed to launch player")
    }
}
