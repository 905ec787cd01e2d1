use hypertext::prelude::*;

/// How many confirmed slots are taken, with a progress bar. Polls `/status`
/// and replaces itself, so the numbers on the home page stay current.
pub struct CapacityCard {
    pub confirmed: usize,
    pub waitlisted: usize,
    pub capacity: u32,
}

impl CapacityCard {
    fn percent(&self) -> usize {
        if self.capacity == 0 {
            return 100;
        }
        (self.confirmed * 100 / self.capacity as usize).min(100)
    }

    pub fn is_full(&self) -> bool {
        self.confirmed >= self.capacity as usize
    }
}

impl Renderable for CapacityCard {
    fn render_to(
        &self,
        buffer: &mut hypertext::Buffer<hypertext::context::Node>,
    ) {
        let width = format!("width: {}%", self.percent());
        let bar_class = if self.is_full() {
            "progress-bar bg-danger"
        } else {
            "progress-bar bg-success"
        };

        maud! {
            div id="capacity" class="card mb-4"
                hx-get="/status"
                hx-trigger="every 15s"
                hx-swap="outerHTML" {
                div class="card-body" {
                    h5 class="card-title" {
                        (self.confirmed.to_string()) " / " (self.capacity.to_string())
                        " teams confirmed"
                    }
                    div class="progress mb-2" role="progressbar" {
                        div class=(bar_class) style=(width) {}
                    }
                    @if self.is_full() {
                        p class="card-text text-danger mb-0" {
                            "All places are taken. New teams join the waitlist."
                        }
                    } @else {
                        p class="card-text mb-0" {
                            ((self.capacity as usize - self.confirmed).to_string())
                            " places left."
                        }
                    }
                    @if self.waitlisted > 0 {
                        p class="card-text text-muted small mb-0" {
                            (self.waitlisted.to_string()) " on the waitlist"
                        }
                    }
                }
            }
        }
        .render_to(buffer);
    }
}

#[cfg(test)]
mod tests {
    use hypertext::prelude::*;

    use super::CapacityCard;

    #[test]
    fn full_card_mentions_the_waitlist() {
        let html = maud! {
            CapacityCard confirmed=(2) waitlisted=(1) capacity=(2);
        }
        .render()
        .into_inner();

        assert!(html.contains("2 / 2 teams confirmed"));
        assert!(html.contains("New teams join the waitlist"));
        assert!(html.contains("1 on the waitlist"));
        assert!(html.contains("width: 100%"));
    }

    #[test]
    fn open_card_counts_the_free_places() {
        let html = maud! {
            CapacityCard confirmed=(3) waitlisted=(0) capacity=(16);
        }
        .render()
        .into_inner();

        assert!(html.contains("13 places left."));
        assert!(!html.contains("on the waitlist"));
    }
}
