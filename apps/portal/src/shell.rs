//! Interactive walk through the four screens on stdin/stdout.

use std::{
    future::Future,
    io::{self, Write},
    sync::Arc,
};

use anyhow::Result;
use client_core::{DashboardState, History, LifetimeHandle, NavigationMode, Portal, SubmitOutcome};
use shared::domain::Route;
use tokio::{
    io::{stdin, AsyncBufRead, AsyncBufReadExt, BufReader, Lines},
    sync::mpsc,
};

/// Drives `fut` to completion. If `trigger` fires first, `handle` is cancelled and `fut`
/// finishes with its cancelled outcome.
pub async fn with_cancel<T, F>(handle: LifetimeHandle, trigger: T, fut: F) -> F::Output
where
    T: Future<Output = ()>,
    F: Future,
{
    tokio::pin!(fut);
    tokio::select! {
        biased;
        output = &mut fut => output,
        () = trigger => {
            handle.cancel();
            fut.await
        }
    }
}

/// Runs `fut` while Ctrl-C cancels `handle`.
pub async fn with_interrupt<F: Future>(handle: LifetimeHandle, fut: F) -> F::Output {
    with_cancel(handle, ctrl_c_pressed(), fut).await
}

async fn ctrl_c_pressed() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Forwards every Ctrl-C for the rest of the run. Once listened for, Ctrl-C no longer
/// terminates the process, so the shell decides what each press means.
fn ctrl_c_presses() -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}

/// Resolves on the next interrupt; never resolves once the sender is gone.
async fn next_interrupt(interrupts: &mut mpsc::UnboundedReceiver<()>) {
    if interrupts.recv().await.is_none() {
        std::future::pending::<()>().await;
    }
}

enum Flow {
    Continue,
    Quit,
}

enum Step {
    Filled,
    Back,
    Quit,
}

struct Shell<R> {
    portal: Portal,
    history: Arc<History>,
    lines: Lines<R>,
    interrupts: mpsc::UnboundedReceiver<()>,
}

pub async fn run(portal: Portal, history: Arc<History>) -> Result<()> {
    println!(
        "Type :back to return home, :quit (or Ctrl-D) to exit. \
         Ctrl-C cancels a pending request, or exits at a prompt."
    );
    run_with(portal, history, BufReader::new(stdin()), ctrl_c_presses()).await
}

/// Runs the screen loop on `input`, treating each message on `interrupts` as a Ctrl-C.
async fn run_with<R: AsyncBufRead + Unpin>(
    portal: Portal,
    history: Arc<History>,
    input: R,
    interrupts: mpsc::UnboundedReceiver<()>,
) -> Result<()> {
    let mut shell = Shell {
        portal,
        history,
        lines: input.lines(),
        interrupts,
    };
    loop {
        let flow = match shell.history.current() {
            Route::Landing => shell.landing().await?,
            Route::Register => shell.register().await?,
            Route::Login => shell.login().await?,
            Route::Dashboard => shell.dashboard().await?,
        };
        if let Flow::Quit = flow {
            return Ok(());
        }
    }
}

impl<R: AsyncBufRead + Unpin> Shell<R> {
    async fn landing(&mut self) -> Result<Flow> {
        let landing = self.portal.landing();
        println!();
        print!("{}", landing.view());

        let mut choice = String::new();
        match self.fill("register or login", &mut choice, false).await? {
            Step::Filled => match choice.to_ascii_lowercase().as_str() {
                "register" | "r" => landing.open_register(),
                "login" | "l" => landing.open_login(),
                other => println!("Unknown choice '{other}'"),
            },
            Step::Back => {}
            Step::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn register(&mut self) -> Result<Flow> {
        let mut controller = self.portal.register();
        println!();
        println!("Create Account");

        loop {
            let mut form = controller.form().clone();
            let fields = [
                ("Name", &mut form.name, false),
                ("Email", &mut form.email, false),
                ("Password", &mut form.password, true),
            ];
            for (label, value, secret) in fields {
                match self.fill(label, value, secret).await? {
                    Step::Filled => {}
                    Step::Back => return Ok(self.leave_to(Route::Landing)),
                    Step::Quit => return Ok(Flow::Quit),
                }
            }

            let outcome = with_cancel(
                controller.lifetime(),
                next_interrupt(&mut self.interrupts),
                controller.submit(form),
            )
            .await;
            match outcome {
                SubmitOutcome::Navigated(_) => {
                    println!("Account created. Please sign in.");
                    return Ok(Flow::Continue);
                }
                SubmitOutcome::Failed => {
                    if let Some(error) = controller.error() {
                        eprintln!("{error}");
                    }
                }
                SubmitOutcome::Cancelled => {
                    println!("Cancelled.");
                    return Ok(Flow::Continue);
                }
            }
        }
    }

    async fn login(&mut self) -> Result<Flow> {
        let mut controller = self.portal.login();
        println!();
        println!("Welcome back");

        loop {
            let mut form = controller.form().clone();
            let fields = [
                ("Email", &mut form.email, false),
                ("Password", &mut form.password, true),
            ];
            for (label, value, secret) in fields {
                match self.fill(label, value, secret).await? {
                    Step::Filled => {}
                    Step::Back => return Ok(self.leave_to(Route::Landing)),
                    Step::Quit => return Ok(Flow::Quit),
                }
            }

            let outcome = with_cancel(
                controller.lifetime(),
                next_interrupt(&mut self.interrupts),
                controller.submit(form),
            )
            .await?;
            match outcome {
                SubmitOutcome::Navigated(_) => return Ok(Flow::Continue),
                SubmitOutcome::Failed => {
                    if let Some(error) = controller.error() {
                        eprintln!("{error}");
                    }
                }
                SubmitOutcome::Cancelled => {
                    println!("Cancelled.");
                    return Ok(Flow::Continue);
                }
            }
        }
    }

    async fn dashboard(&mut self) -> Result<Flow> {
        let mut controller = self.portal.dashboard();
        println!();
        println!("Loading...");
        let state = with_cancel(
            controller.lifetime(),
            next_interrupt(&mut self.interrupts),
            controller.mount(),
        )
        .await
        .clone();

        match state {
            DashboardState::Authorized(_) => {}
            DashboardState::Unauthorized => {
                println!("Please sign in.");
                return Ok(Flow::Continue);
            }
            DashboardState::Checking => {
                println!("Cancelled.");
                controller.back_to_home();
                return Ok(Flow::Continue);
            }
        }

        if let Some(view) = controller.view() {
            print!("{view}");
        }
        loop {
            let mut choice = String::new();
            match self.fill("logout or home", &mut choice, false).await? {
                Step::Filled => match choice.to_ascii_lowercase().as_str() {
                    "logout" => {
                        controller.logout().await?;
                        println!("Signed out.");
                        return Ok(Flow::Continue);
                    }
                    "home" => {
                        controller.back_to_home();
                        return Ok(Flow::Continue);
                    }
                    other => println!("Unknown choice '{other}'"),
                },
                Step::Back => {
                    controller.back_to_home();
                    return Ok(Flow::Continue);
                }
                Step::Quit => return Ok(Flow::Quit),
            }
        }
    }

    fn leave_to(&self, route: Route) -> Flow {
        self.portal.navigator.navigate(route, NavigationMode::Push);
        Flow::Continue
    }

    /// Reads one line into `value`. A blank line keeps a non-secret value already present.
    /// Ctrl-C or end of input quits.
    async fn fill(&mut self, label: &str, value: &mut String, secret: bool) -> Result<Step> {
        if secret || value.is_empty() {
            print!("{label}: ");
        } else {
            print!("{label} [{value}]: ");
        }
        io::stdout().flush()?;

        let line = tokio::select! {
            biased;
            () = next_interrupt(&mut self.interrupts) => {
                println!();
                return Ok(Step::Quit);
            }
            line = self.lines.next_line() => line?,
        };
        let Some(line) = line else {
            return Ok(Step::Quit);
        };
        match line.trim() {
            ":quit" => Ok(Step::Quit),
            ":back" => Ok(Step::Back),
            "" if !secret && !value.is_empty() => Ok(Step::Filled),
            input => {
                *value = input.to_string();
                Ok(Step::Filled)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
